//! Selection reporting to the host application.

/// Receives the full path of each folder the user selects.
///
/// Called once per selection; repeated calls over time are normal.
pub trait SelectionConsumer: Send + Sync + 'static {
    /// A folder was selected.
    fn folder_selected(&self, path: &str);
}

impl<F> SelectionConsumer for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn folder_selected(&self, path: &str) {
        self(path)
    }
}

/// Consumer that ignores selections.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopConsumer;

impl SelectionConsumer for NoopConsumer {
    fn folder_selected(&self, _path: &str) {}
}
