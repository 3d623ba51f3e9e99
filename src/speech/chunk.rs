//! Splitting text into provider-sized pieces
//!
//! The hosted endpoint rejects requests longer than about 100 characters.
//! Text is cut after sentence punctuation first, then at spaces, and only as
//! a last resort in the middle of a word. Adjacent pieces are merged back
//! together while they fit, to keep the request count and the audible seams
//! down.

/// Characters that end a natural pause
const PAUSE_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', '¡', '¿', '…', '。', '、', '，', '！', '？', '\n',
];

/// Split `text` into chunks of at most `max_chars` characters each.
///
/// Whitespace is normalised to single spaces. Pieces with nothing
/// pronounceable (only punctuation) are dropped.
#[must_use]
pub fn split_for_speech(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);

    let pieces = split_at_pauses(text)
        .into_iter()
        .flat_map(|piece| split_long(&piece, max_chars))
        .filter(|piece| piece.chars().any(char::is_alphanumeric));

    let mut chunks: Vec<String> = Vec::new();
    for piece in pieces {
        match chunks.last_mut() {
            Some(last) if last.chars().count() + 1 + piece.chars().count() <= max_chars => {
                last.push(' ');
                last.push_str(&piece);
            }
            _ => chunks.push(piece),
        }
    }
    chunks
}

/// Cut after each pause character, trimming and normalising whitespace
fn split_at_pauses(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if c == '\n' {
            push_normalised(&mut pieces, &current);
            current.clear();
            continue;
        }
        current.push(c);
        if PAUSE_PUNCTUATION.contains(&c) {
            push_normalised(&mut pieces, &current);
            current.clear();
        }
    }
    push_normalised(&mut pieces, &current);
    pieces
}

fn push_normalised(pieces: &mut Vec<String>, raw: &str) {
    let normalised = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if !normalised.is_empty() {
        pieces.push(normalised);
    }
}

/// Break a piece longer than `max_chars` at spaces, hard-splitting words
/// that alone exceed the limit
fn split_long(piece: &str, max_chars: usize) -> Vec<String> {
    if piece.chars().count() <= max_chars {
        return vec![piece.to_string()];
    }

    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in piece.split(' ') {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            out.extend(chars.chunks(max_chars).map(|c| c.iter().collect::<String>()));
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed <= max_chars {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_len = needed;
        } else {
            out.push(std::mem::replace(&mut current, word.to_string()));
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}
