use std::io;
use std::path::Path;
use tokenizers::{PaddingParams, Tokenizer, TruncationParams};

/// Loads `tokenizer.json` from a model directory or an explicit tokenizer path.
pub fn load_tokenizer(model_path: &Path) -> io::Result<Tokenizer> {
    let tokenizer_path = if model_path.is_dir() {
        model_path.join("tokenizer.json")
    } else {
        model_path.to_path_buf()
    };

    Tokenizer::from_file(&tokenizer_path).map_err(io::Error::other)
}

/// Loads a tokenizer that truncates to `max_len` tokens and pads batches to the longest item.
///
/// Sliding windows are measured in words and routinely exceed the encoder's token limit, so
/// truncation is mandatory rather than an optimisation.
pub fn load_tokenizer_for_encoder(model_path: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let mut tokenizer = load_tokenizer(model_path)?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;
    tokenizer.with_padding(Some(PaddingParams::default()));

    Ok(tokenizer)
}
