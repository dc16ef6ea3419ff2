/// Injected credential capability. The source of the key (environment,
/// secret store, test fixture) is an adapter concern; callers only ask
/// whether one is currently selected.
pub trait CredentialProvider: Send + Sync {
    fn credential(&self) -> Option<String>;

    fn has_credential(&self) -> bool {
        self.credential().is_some()
    }
}
