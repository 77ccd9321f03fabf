// Text preprocessing hook.
//
// Normalization (whitespace, quote unification, leetspeak, Unicode folding
// for Devanagari and Odia) is deliberately not implemented. preprocess() is
// an identity function so that detector input and span offsets always refer
// to the exact text the user submitted.

/// Prepare text for the detectors. Currently returns the input unchanged.
pub fn preprocess(text: &str) -> &str {
    text
}
