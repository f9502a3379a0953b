use std::{path::Path, sync::Arc};

use tokio::{fs::File, sync::RwLock};

/// Shared, immutable string. Cloning only bumps a reference count.
pub type ArcStr = Arc<str>;

/// Shared, immutable filesystem path.
pub type ArcPath = Arc<Path>;

/// Open file handle shared between tasks.
pub type ArcFile = Arc<RwLock<File>>;

