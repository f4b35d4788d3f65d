//! Ordinal color scale over group values.

use super::types::GroupKey;

/// The Tableau10 categorical palette.
pub const TABLEAU10: &[&str] = &[
	"#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
	"#9c755f", "#bab0ab",
];

/// Maps each domain value to a palette entry by position, cycling when the
/// domain outgrows the palette.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorScale {
	domain: Vec<GroupKey>,
	range: Vec<String>,
}

impl ColorScale {
	/// Colors are assigned in the order `domain` is given.
	pub fn new(domain: Vec<GroupKey>, palette: &[String]) -> Self {
		Self {
			domain,
			range: palette.to_vec(),
		}
	}

	pub fn domain(&self) -> &[GroupKey] {
		&self.domain
	}

	/// Color for a value, or `None` if the value is outside the domain.
	pub fn color(&self, value: &GroupKey) -> Option<&str> {
		if self.range.is_empty() {
			return None;
		}
		let pos = self.domain.iter().position(|v| v == value)?;
		Some(&self.range[pos % self.range.len()])
	}
}

/// Tableau10 as owned strings, the default palette.
pub fn default_palette() -> Vec<String> {
	TABLEAU10.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scale(values: &[&str]) -> ColorScale {
		ColorScale::new(values.iter().map(|v| GroupKey::from(*v)).collect(), &default_palette())
	}

	#[test]
	fn assigns_palette_in_domain_order() {
		let s = scale(&["a", "b", "c"]);
		assert_eq!(s.color(&"a".into()), Some("#4e79a7"));
		assert_eq!(s.color(&"c".into()), Some("#e15759"));
		assert_eq!(s.color(&"d".into()), None);
	}

	#[test]
	fn same_domain_gives_same_colors() {
		let first = scale(&["x", "y"]);
		let second = scale(&["x", "y"]);
		assert_eq!(first, second);
		assert_eq!(first.color(&"y".into()), second.color(&"y".into()));
	}

	#[test]
	fn palette_wraps_for_large_domains() {
		let values: Vec<String> = (0..12).map(|i| format!("g{i:02}")).collect();
		let refs: Vec<&str> = values.iter().map(String::as_str).collect();
		let s = scale(&refs);
		assert_eq!(s.color(&"g10".into()), s.color(&"g00".into()));
		assert_eq!(s.color(&"g11".into()), Some("#f28e2c"));
	}

	#[test]
	fn empty_palette_colors_nothing() {
		let s = ColorScale::new(vec!["a".into()], &[]);
		assert_eq!(s.color(&"a".into()), None);
	}

	#[test]
	fn caller_order_decides_colors() {
		let s = scale(&["c", "a", "b"]);
		assert_eq!(s.color(&"c".into()), Some("#4e79a7"));
		assert_eq!(s.color(&"a".into()), Some("#f28e2c"));
		assert_eq!(s.domain()[0], GroupKey::text("c"));
	}
}
