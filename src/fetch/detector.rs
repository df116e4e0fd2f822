//! Challenge-page detection
//!
//! A bot-challenge page comes back as a perfectly valid 200 HTML document, so
//! it parses without complaint and the extractor then finds garbage (or a
//! CAPTCHA image) in it. The detector runs on every successful body before any
//! parsing happens.

/// Verdict on a fetched body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No challenge marker found
    Clean,
    /// The body matched a challenge marker
    Adversarial {
        /// The marker that matched, as configured
        marker: String,
    },
}

/// Case-insensitive substring scanner for challenge-page markers
#[derive(Debug, Clone)]
pub struct Detector {
    /// (configured marker, lowercase form)
    markers: Vec<(String, String)>,
}

impl Detector {
    pub fn new(markers: &[String]) -> Self {
        Self {
            markers: markers
                .iter()
                .filter(|m| !m.is_empty())
                .map(|m| (m.clone(), m.to_lowercase()))
                .collect(),
        }
    }

    /// Scans a body for the first configured marker it contains
    pub fn classify(&self, body: &str) -> Verdict {
        let haystack = body.to_lowercase();

        self.markers
            .iter()
            .find(|(_, lower)| haystack.contains(lower.as_str()))
            .map_or(Verdict::Clean, |(marker, _)| Verdict::Adversarial {
                marker: marker.clone(),
            })
    }
}
