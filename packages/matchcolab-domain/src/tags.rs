use std::{collections::BTreeSet, fmt};

/// Separator used when a tag set is written back out as a single string.
pub const TAG_SEPARATOR: &str = ", ";

/// Case-normalized set of genre or style tags.
///
/// Parsing splits on commas, trims every piece and lower-cases it. Empty pieces are dropped, so
/// an empty or whitespace-only string yields an empty set. Ordering and duplicates in the input
/// never matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(BTreeSet<String>);
impl TagSet {
	pub fn parse(raw: &str) -> Self {
		raw.split(',').collect()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn contains(&self, tag: &str) -> bool {
		self.0.contains(&normalize_tag(tag))
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	pub fn union(&self, other: &Self) -> Self {
		Self(self.0.union(&other.0).cloned().collect())
	}

	/// Number of distinct tags present in both sets.
	pub fn overlap(&self, other: &Self) -> usize {
		let (small, large) =
			if self.0.len() <= other.0.len() { (&self.0, &other.0) } else { (&other.0, &self.0) };

		small.iter().filter(|tag| large.contains(*tag)).count()
	}

	pub fn to_tag_string(&self) -> String {
		self.iter().collect::<Vec<_>>().join(TAG_SEPARATOR)
	}
}
impl<S> FromIterator<S> for TagSet
where
	S: AsRef<str>,
{
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Self(
			iter.into_iter()
				.map(|tag| normalize_tag(tag.as_ref()))
				.filter(|tag| !tag.is_empty())
				.collect(),
		)
	}
}
impl fmt::Display for TagSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_tag_string())
	}
}

fn normalize_tag(tag: &str) -> String {
	tag.trim().to_lowercase()
}
