//! First-message composition.

use rand::Rng;
use rand::seq::IndexedRandom;

/// Templates for a first message; `{}` is the match's first name.
const TEMPLATES: &[&str] = &[
	"Hey {}! How's your day going? \u{1F60A}",
	"Hi {}! Nice to match with you. What are you up to?",
	"Hello {}! \u{1F44B} Hope you're having a good one.",
	"Hey {}, pleasure to connect!",
];

/// Extracts a first name from a match entry's accessibility description
/// (typically `"Name, 24"` or `"Name Lastname"`).
pub fn first_name(description: &str) -> &str {
	description
		.split(',')
		.next()
		.unwrap_or(description)
		.split_whitespace()
		.next()
		.unwrap_or(description)
}

/// Picks one greeting template and fills in the first name.
pub fn compose<R: Rng>(match_description: &str, rng: &mut R) -> String {
	let name = first_name(match_description);
	let template = TEMPLATES.choose(rng).copied().unwrap_or(TEMPLATES[0]);
	template.replacen("{}", name, 1)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn first_name_handles_common_shapes() {
		assert_eq!(first_name("Alex, 24"), "Alex");
		assert_eq!(first_name("Sam Jordan"), "Sam");
		assert_eq!(first_name("Maria"), "Maria");
		assert_eq!(first_name(""), "");
	}

	#[test]
	fn compose_embeds_the_name() {
		let mut rng = StdRng::seed_from_u64(7);
		let message = compose("Alex, 24", &mut rng);
		assert!(message.contains("Alex"), "message was: {message}");
		assert!(!message.contains("{}"));
	}

	#[test]
	fn compose_varies_across_draws() {
		let mut rng = StdRng::seed_from_u64(7);
		let mut seen = std::collections::HashSet::new();
		for _ in 0..50 {
			seen.insert(compose("Alex", &mut rng));
		}
		assert!(seen.len() > 1);
	}
}
