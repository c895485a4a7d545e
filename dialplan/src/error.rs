use thiserror::Error;

/// Structural problems that stop a run before anything is compiled.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AbortReason {
    #[error("no modules found")]
    EmptyTree,
    #[error("no root module")]
    NoRoot,
    #[error("several root modules found")]
    MultipleRoots,
    #[error("module {0} is defined more than once")]
    DuplicateModule(i64),
    #[error("module {module} references unknown parent {parent}")]
    DanglingParent { module: i64, parent: i64 },
    #[error("module {0} is not reachable from the root")]
    Unreachable(i64),
    #[error("modules {first} and {second} share key {phone_key} under parent {parent}")]
    DuplicatePhoneKey {
        parent: i64,
        phone_key: String,
        first: i64,
        second: i64,
    },
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("can't load modules: {0:#}")]
    Load(anyhow::Error),
    #[error("switchboard {0} doesn't exist")]
    SwitchboardNotFound(i64),
    #[error("aborted: {0}")]
    Abort(#[from] AbortReason),
    #[error("can't write dialplan: {0}")]
    Write(#[from] std::io::Error),
}
