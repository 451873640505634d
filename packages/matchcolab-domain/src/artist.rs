/// A known artist and, once indexed, the embedding of its tag string.
#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
	pub name: String,
	pub tags: String,
	pub embedding: Option<Vec<f32>>,
}
impl Artist {
	pub fn new(name: impl Into<String>, tags: impl Into<String>) -> Self {
		Self { name: name.into(), tags: tags.into(), embedding: None }
	}

	pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
		self.embedding = Some(embedding);

		self
	}

	/// Returns the embedding only when it is present and non-empty. Anything else means the
	/// artist has not been indexed yet.
	pub fn indexed_embedding(&self) -> Option<&[f32]> {
		self.embedding.as_deref().filter(|embedding| !embedding.is_empty())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
	Success,
	Failure,
}
impl Outcome {
	/// Only the exact label `Success` counts as a success. Unknown labels are treated as failures.
	pub fn from_label(label: &str) -> Self {
		if label == "Success" { Self::Success } else { Self::Failure }
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Success => "Success",
			Self::Failure => "Failure",
		}
	}
}

/// One past collaboration. Tag fields are kept as the raw strings stored at recording time and
/// may be missing on malformed rows.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
	pub artist1_tags: Option<String>,
	pub artist2_tags: Option<String>,
	pub outcome: Outcome,
}
impl HistoryRecord {
	pub fn new(artist1_tags: &str, artist2_tags: &str, outcome: Outcome) -> Self {
		Self {
			artist1_tags: Some(artist1_tags.to_string()),
			artist2_tags: Some(artist2_tags.to_string()),
			outcome,
		}
	}
}
