use anyhow::Result;

/// Everything the timer touches lives on one thread, so this is the only runtime we need.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
