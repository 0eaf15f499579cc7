/// Sentence fragments shorter than this (trimmed) are discarded outright.
const MIN_SENTENCE_LEN: usize = 20;
/// Sentences per sliding window.
const WINDOW: usize = 4;
/// Sentences stepped over between windows; WINDOW - STRIDE sentences are
/// shared with the previous chunk so a sentence can feed several questions.
const STRIDE: usize = 2;
/// Joined windows shorter than this are dropped.
const MIN_CHUNK_LEN: usize = 50;

/// A bounded, overlapping window of consecutive sentences. Offsets are char
/// positions into the source text.
#[derive(Clone, Debug)]
pub struct Chunk {
    pub content: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Clone, Debug)]
pub struct Sentence {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Split on sentence-terminating punctuation, keeping char offsets. A
/// trailing fragment without a terminator is kept as a sentence of its own.
pub fn split_sentences(text: &str) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut buf = String::new();
    let mut buf_start = 0usize;

    for (i, ch) in text.chars().enumerate() {
        if buf.is_empty() {
            buf_start = i;
        }
        buf.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            push_sentence(&mut sentences, &buf, buf_start);
            buf.clear();
        }
    }
    push_sentence(&mut sentences, &buf, buf_start);

    sentences
}

fn push_sentence(out: &mut Vec<Sentence>, raw: &str, raw_start: usize) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = raw.chars().take_while(|c| c.is_whitespace()).count();
    let start = raw_start + lead;
    out.push(Sentence {
        text: trimmed.to_string(),
        start,
        end: start + trimmed.chars().count(),
    });
}

/// Split `text` into overlapping sentence windows. An input with no usable
/// sentences yields an empty Vec, never an error; the caller falls back.
pub fn chunk(text: &str) -> Vec<Chunk> {
    let sentences: Vec<Sentence> = split_sentences(text)
        .into_iter()
        .filter(|s| s.text.chars().count() >= MIN_SENTENCE_LEN)
        .collect();
    if sentences.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut i = 0;
    loop {
        let window = &sentences[i..(i + WINDOW).min(sentences.len())];
        let content = window
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if content.chars().count() >= MIN_CHUNK_LEN {
            chunks.push(Chunk {
                content,
                start: window[0].start,
                end: window[window.len() - 1].end,
            });
        }
        // Once a window reaches the final sentence, further strides would
        // only re-emit suffixes of it.
        if i + WINDOW >= sentences.len() {
            break;
        }
        i += STRIDE;
    }

    chunks
}
