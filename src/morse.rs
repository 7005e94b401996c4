//! Morse code table, text conversion and a timing based keying decoder.

use std::time::Duration;

const TABLE: &[(char, &str)] = &[
  ('A', ".-"),
  ('B', "-..."),
  ('C', "-.-."),
  ('D', "-.."),
  ('E', "."),
  ('F', "..-."),
  ('G', "--."),
  ('H', "...."),
  ('I', ".."),
  ('J', ".---"),
  ('K', "-.-"),
  ('L', ".-.."),
  ('M', "--"),
  ('N', "-."),
  ('O', "---"),
  ('P', ".--."),
  ('Q', "--.-"),
  ('R', ".-."),
  ('S', "..."),
  ('T', "-"),
  ('U', "..-"),
  ('V', "...-"),
  ('W', ".--"),
  ('X', "-..-"),
  ('Y', "-.--"),
  ('Z', "--.."),
  ('1', ".----"),
  ('2', "..---"),
  ('3', "...--"),
  ('4', "....-"),
  ('5', "....."),
  ('6', "-...."),
  ('7', "--..."),
  ('8', "---.."),
  ('9', "----."),
  ('0', "-----"),
  (' ', "/"),
];

/// Silence longer than this closes the current letter.
pub const LETTER_GAP: Duration = Duration::from_millis(800);
/// Silence longer than this closes the current word.
pub const WORD_GAP: Duration = Duration::from_millis(1500);

fn code_of(c: char) -> Option<&'static str> {
  TABLE.iter().find(|(ch, _)| *ch == c).map(|(_, code)| *code)
}

fn char_of(code: &str) -> Option<char> {
  TABLE.iter().find(|(_, c)| *c == code).map(|(ch, _)| *ch)
}

/// Converts text to space separated codes. Unsupported characters are dropped.
pub fn encode(text: &str) -> String {
  text.to_uppercase().chars().filter_map(code_of).collect::<Vec<_>>().join(" ")
}

/// Converts space separated codes back to text. Unknown codes are dropped.
pub fn decode(signal: &str) -> String {
  signal.split(' ').filter_map(char_of).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
  Dot,
  Dash,
}

impl Symbol {
  fn as_char(self) -> char {
    match self {
      Symbol::Dot => '.',
      Symbol::Dash => '-',
    }
  }
}

/// Turns a stream of timed key presses into text.
#[derive(Debug, Default)]
pub struct Decoder {
  symbol: String,
  word: String,
  words: Vec<String>,
  last: Option<Duration>,
}

impl Decoder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Feeds a symbol keyed at `at`, measured from any fixed origin.
  pub fn push(&mut self, symbol: Symbol, at: Duration) {
    if let Some(last) = self.last {
      let gap = at.saturating_sub(last);
      if gap > WORD_GAP {
        self.finish_letter();
        self.finish_word();
      } else if gap > LETTER_GAP {
        self.finish_letter();
      }
    }

    self.symbol.push(symbol.as_char());
    self.last = Some(at);
  }

  /// Closes whatever is pending, as if a word gap had elapsed.
  pub fn flush(&mut self) {
    self.finish_letter();
    self.finish_word();
  }

  /// Finished words, joined by spaces.
  pub fn text(&self) -> String {
    self.words.join(" ")
  }

  pub fn reset(&mut self) {
    *self = Self::default();
  }

  fn finish_letter(&mut self) {
    if let Some(c) = char_of(&self.symbol) {
      self.word.push(c);
    }
    self.symbol.clear();
  }

  fn finish_word(&mut self) {
    if !self.word.trim().is_empty() {
      self.words.push(std::mem::take(&mut self.word));
    }
    self.word.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_trip() {
    for text in ["SOS", "HELLO WORLD", "ABC123", "THE QUICK BROWN FOX 0987654321"] {
      assert_eq!(decode(&encode(text)), text);
    }
  }

  #[test]
  fn encode_is_case_insensitive_and_drops_unsupported() {
    assert_eq!(encode("sos"), "... --- ...");
    assert_eq!(encode("a!b"), ".- -...");
    assert_eq!(encode("hi there"), ".... .. / - .... . .-. .");
    assert_eq!(encode("?!"), "");
  }

  #[test]
  fn decode_drops_unknown_codes() {
    assert_eq!(decode(".- ........ -..."), "AB");
    assert_eq!(decode(""), "");
  }

  #[test]
  fn decoder_splits_letters_and_words_on_gaps() {
    let ms = Duration::from_millis;
    let mut decoder = Decoder::new();

    // S
    decoder.push(Symbol::Dot, ms(0));
    decoder.push(Symbol::Dot, ms(200));
    decoder.push(Symbol::Dot, ms(400));
    // O
    decoder.push(Symbol::Dash, ms(1300));
    decoder.push(Symbol::Dash, ms(1500));
    decoder.push(Symbol::Dash, ms(1700));
    // E, after a word gap
    decoder.push(Symbol::Dot, ms(3500));
    assert_eq!(decoder.text(), "SO");

    decoder.flush();
    assert_eq!(decoder.text(), "SO E");

    decoder.reset();
    assert_eq!(decoder.text(), "");
  }

  #[test]
  fn decoder_ignores_unknown_letters() {
    let ms = Duration::from_millis;
    let mut decoder = Decoder::new();
    for i in 0..8 {
      decoder.push(Symbol::Dot, ms(i * 100));
    }
    decoder.flush();
    assert_eq!(decoder.text(), "");
  }
}
