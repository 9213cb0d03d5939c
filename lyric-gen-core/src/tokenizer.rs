/// Characters that close a sentence when they end a token.
pub const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Splits corpus text into word tokens.
///
/// Tokens are maximal runs of non-whitespace characters. Punctuation stays
/// attached to its word since it marks sentence ends; no case folding is done.
pub fn tokenize(text: &str) -> Vec<String> {
	text.split_whitespace().map(str::to_owned).collect()
}

/// Returns `true` if the token ends with `.`, `!` or `?`.
pub fn is_terminal(token: &str) -> bool {
	token.ends_with(TERMINATORS)
}

/// Returns `true` if the token starts with an uppercase character.
///
/// Generated text breaks the line before such words.
pub fn starts_line(token: &str) -> bool {
	token.chars().next().is_some_and(char::is_uppercase)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_split_on_whitespace_runs() {
		let tokens = tokenize("testing  split\tfunction\n\nnow");
		assert_eq!(tokens, vec!["testing", "split", "function", "now"]);
	}

	#[test]
	fn test_punctuation_kept() {
		let tokens = tokenize("Hey, you! Don't stop.");
		assert_eq!(tokens, vec!["Hey,", "you!", "Don't", "stop."]);
	}

	#[test]
	fn test_empty_input() {
		assert!(tokenize("").is_empty());
		assert!(tokenize(" \n\t ").is_empty());
	}

	#[test]
	fn test_concatenated_documents_merge_words() {
		// Files are joined without a separator.
		let tokens = tokenize("first song endsecond song");
		assert_eq!(tokens, vec!["first", "song", "endsecond", "song"]);
	}

	#[test]
	fn test_terminal() {
		assert!(is_terminal("am."));
		assert!(is_terminal("why?"));
		assert!(is_terminal("now!"));
		assert!(!is_terminal("wait,"));
		assert!(!is_terminal(".hidden"));
		assert!(!is_terminal(""));
	}

	#[test]
	fn test_starts_line() {
		assert!(starts_line("You"));
		assert!(starts_line("Éloise"));
		assert!(!starts_line("you"));
		assert!(!starts_line("'Cause"));
		assert!(!starts_line(""));
	}
}
