use anyhow::Result;

/// All work happens on one thread; the only suspension points are HTTP calls.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
