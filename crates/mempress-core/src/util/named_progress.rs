use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Extension trait for creating named progress bars.
pub trait NamedProgress {
    /// Creates a progress bar style with a name label.
    ///
    /// # Arguments
    ///
    /// * `name` - Label to display with the progress bar
    fn named_bar(name: &str) -> Self;
}

impl NamedProgress for ProgressStyle {
    fn named_bar(name: &str) -> Self {
        let fmt = format!(
            "{name:<24} {{wide_bar:40.cyan/blue}} {{pos:>7}}/{{len:<7}} [{{elapsed_precise}}] {{msg}}"
        );
        ProgressStyle::default_bar()
            .template(&fmt)
            .unwrap_or(ProgressStyle::default_bar())
    }
}

/// Adds a named bar of length `len` to `progress`.
///
/// Returns `None` if no progress display is attached, so callers can write
/// `bar.as_ref().map(|b| b.inc(1))` without branching.
pub fn pressure_bar(progress: Option<&MultiProgress>, name: &str, len: u64) -> Option<ProgressBar> {
    progress.map(|p| {
        let bar = p.add(ProgressBar::new(len));
        bar.set_style(ProgressStyle::named_bar(name));
        bar
    })
}
