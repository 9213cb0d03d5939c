use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::MarkovError;

/// Order of a Markov model: how many preceding words form a context.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Order {
	First,
	Second,
}

impl Order {
	/// Number of words in a context of this order.
	pub fn size(self) -> usize {
		match self {
			Order::First => 1,
			Order::Second => 2,
		}
	}
}

impl TryFrom<usize> for Order {
	type Error = MarkovError;

	fn try_from(value: usize) -> Result<Self, Self::Error> {
		match value {
			1 => Ok(Order::First),
			2 => Ok(Order::Second),
			other => Err(MarkovError::InvalidOrder(other.to_string())),
		}
	}
}

impl FromStr for Order {
	type Err = MarkovError;

	/// Accepts `1`/`2` as well as `first`/`second` (case-insensitive).
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"1" | "first" => Ok(Order::First),
			"2" | "second" => Ok(Order::Second),
			_ => Err(MarkovError::InvalidOrder(s.to_owned())),
		}
	}
}

impl fmt::Display for Order {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.size())
	}
}

/// Lookup key into a transition table.
///
/// `Start` collects the words that may open a sentence. `Single` keys an
/// order-1 table and `Pair` keys an order-2 table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Context {
	Start,
	Single(String),
	Pair(String, String),
}

impl Context {
	/// Builds the context that follows this one once `word` has been emitted.
	///
	/// `Start` and `Single` slide to `Single(word)`; `Pair(a, b)` slides to
	/// `Pair(b, word)`.
	pub fn advance(&self, word: &str) -> Context {
		match self {
			Context::Start | Context::Single(_) => Context::Single(word.to_owned()),
			Context::Pair(_, second) => Context::Pair(second.clone(), word.to_owned()),
		}
	}
}

impl fmt::Display for Context {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Context::Start => write!(f, "<start>"),
			Context::Single(word) => write!(f, "{word:?}"),
			Context::Pair(first, second) => write!(f, "({first:?}, {second:?})"),
		}
	}
}

/// A value observed after a context: either a word, or the end of the sentence.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Successor {
	Word(String),
	End,
}

impl Successor {
	pub fn word(&self) -> Option<&str> {
		match self {
			Successor::Word(word) => Some(word),
			Successor::End => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_order_parsing() {
		assert_eq!("1".parse::<Order>().unwrap(), Order::First);
		assert_eq!(" Second ".parse::<Order>().unwrap(), Order::Second);
		assert_eq!(Order::try_from(2).unwrap(), Order::Second);
		assert!(matches!("3".parse::<Order>(), Err(MarkovError::InvalidOrder(_))));
		assert!(matches!(Order::try_from(0), Err(MarkovError::InvalidOrder(_))));
	}

	#[test]
	fn test_advance() {
		let start = Context::Start.advance("I");
		assert_eq!(start, Context::Single("I".into()));
		assert_eq!(start.advance("am."), Context::Single("am.".into()));

		let pair = Context::Pair("I".into(), "am".into());
		assert_eq!(pair.advance("fine."), Context::Pair("am".into(), "fine.".into()));
	}

	#[test]
	fn test_display() {
		assert_eq!(Context::Start.to_string(), "<start>");
		assert_eq!(Context::Pair("a".into(), "b".into()).to_string(), "(\"a\", \"b\")");
	}
}
