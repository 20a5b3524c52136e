//! Progress bar utilities
//!
//! Progress indicators for long-running mapping requests.

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar over a known number of items
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})")
            .expect("Invalid progress bar template")
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_progress_bar() {
        let pb = create_progress_bar(4, "Mapping chunks");
        assert_eq!(pb.length(), Some(4));
        pb.finish();
    }
}
