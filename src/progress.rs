/// Creates a spinner shown while a request is in flight.
///
/// # Arguments
/// * `message` - Text displayed next to the spinner.
///
/// # Returns
/// * `indicatif::ProgressBar` - Spinner ticking on its own thread; finish it with `finish_and_clear`.
pub fn spinner(message: &str) -> indicatif::ProgressBar {
    let pb = indicatif::ProgressBar::new_spinner();
    pb.set_style(
        indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Awaits `future` while a spinner is displayed.
pub async fn with_spinner<F, T>(message: &str, future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let pb = spinner(message);
    let output = future.await;
    pb.finish_and_clear();
    output
}
