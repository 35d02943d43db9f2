//! Append-only audit trail writer
//!
//! Each record is the line `"{name}   {expiry}\n"`, base64 encoded and
//! appended to the audit file with no delimiter. Base64 here only keeps the
//! file printable; it hides nothing.

use crate::config::AuditConfig;
use crate::core::OperationContext;
use crate::domain::{DrugDetails, PharmaError, ResponseEnvelope, Result, StoreFault};
use base64::{engine::general_purpose, Engine as _};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Content of the success envelope returned by an append
pub const SUCCESS_MARKER: &str = "success";

/// Gap between name and expiry inside a record
const FIELD_SEPARATOR: &str = "   ";

/// Pause between attempts on a file another process holds
const FILE_LOCK_RETRY: Duration = Duration::from_millis(20);

type LockRegistry = std::sync::Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>;

/// One async mutex per audit file, shared by every writer in the process
///
/// Keyed by the canonical parent directory joined with the file name, so
/// `a/../audit.txt` and `audit.txt` share a lock. Symlinked file names are
/// not resolved. Entries are never removed; the registry grows by one per
/// distinct audit file the process writes.
static PATH_LOCKS: OnceLock<LockRegistry> = OnceLock::new();

/// Writes encoded drug records to an audit file
///
/// # Example
///
/// ```no_run
/// use pharmastore::audit::AuditWriter;
/// use pharmastore::config::AuditConfig;
/// use pharmastore::core::OperationContext;
/// use pharmastore::domain::DrugDetails;
///
/// # async fn example() {
/// let writer = AuditWriter::new(&AuditConfig::default());
/// let envelope = writer
///     .append(&OperationContext::background(), &DrugDetails::new("Aspirin", "2025-01-01"))
///     .await;
/// assert!(envelope.is_success());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AuditWriter {
    file_path: PathBuf,
}

impl AuditWriter {
    pub fn new(config: &AuditConfig) -> Self {
        Self {
            file_path: PathBuf::from(&config.file_path),
        }
    }

    /// Configured audit file
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Appends a record to the configured audit file
    pub async fn append(&self, ctx: &OperationContext, details: &DrugDetails) -> ResponseEnvelope {
        Self::append_to(ctx, &self.file_path, details).await
    }

    /// Appends a record to `path`
    ///
    /// Appends to the same path are serialized process-wide by an async
    /// mutex, and across processes by an exclusive advisory lock on the open
    /// file, so concurrent callers never interleave their blocks. The
    /// context bounds waiting for both locks and opening the file; once the
    /// write has started it runs to completion. The file handle is closed
    /// before this returns on every path.
    pub async fn append_to(
        ctx: &OperationContext,
        path: &Path,
        details: &DrugDetails,
    ) -> ResponseEnvelope {
        let block = encode_record(details);

        let result = match ctx.run(open_exclusive(path)).await {
            Ok((guard, file)) => write_block(file, guard, &block, path).await,
            Err(fault) => Err(fault),
        };

        let envelope = ResponseEnvelope::from(result.map(|()| SUCCESS_MARKER.to_string()));
        match envelope.fault_kind() {
            None => tracing::debug!(
                path = %path.display(),
                bytes = block.len(),
                "Audit record appended"
            ),
            Some(kind) => tracing::warn!(
                path = %path.display(),
                fault_kind = %kind,
                reason = envelope.failure_reason().unwrap_or_default(),
                "Audit append failed"
            ),
        }
        envelope
    }
}

/// Base64 block for one record
pub fn encode_record(details: &DrugDetails) -> String {
    let line = format!(
        "{}{FIELD_SEPARATOR}{}\n",
        details.drug_name, details.drug_expired_on
    );
    general_purpose::STANDARD.encode(line.as_bytes())
}

/// Decodes one base64 block back into its record line
///
/// # Errors
///
/// Returns a serialization error if the block is not valid base64 or the
/// decoded bytes are not UTF-8.
pub fn decode_record(block: &str) -> Result<String> {
    let bytes = general_purpose::STANDARD
        .decode(block.trim())
        .map_err(|e| PharmaError::Serialization(format!("Invalid audit block: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| PharmaError::Serialization(format!("Audit block is not UTF-8: {e}")))
}

fn lock_key(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|dir| dir.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => std::fs::canonicalize(parent)
            .map(|dir| dir.join(name))
            .unwrap_or(absolute),
        _ => absolute,
    }
}

fn path_lock(path: &Path) -> Arc<Mutex<()>> {
    let key = lock_key(path);
    let registry = PATH_LOCKS.get_or_init(Default::default);
    let mut locks = registry
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    locks.entry(key).or_default().clone()
}

/// Takes the path's lock, opens the file for appending, then locks the file
async fn open_exclusive(
    path: &Path,
) -> std::result::Result<(OwnedMutexGuard<()>, File), StoreFault> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| io_fault("create directory", parent, e))?;
    }

    let guard = path_lock(path).lock_owned().await;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| io_fault("open", path, e))?
        .into_std()
        .await;
    lock_file(&file, path).await?;

    Ok((guard, File::from_std(file)))
}

/// Polls for the exclusive advisory lock so the context can abandon the wait
async fn lock_file(file: &std::fs::File, path: &Path) -> std::result::Result<(), StoreFault> {
    let contended = fs2::lock_contended_error().raw_os_error();
    loop {
        match fs2::FileExt::try_lock_exclusive(file) {
            Ok(()) => return Ok(()),
            Err(e) if e.raw_os_error() == contended => {
                tokio::time::sleep(FILE_LOCK_RETRY).await;
            }
            Err(e) => return Err(io_fault("lock", path, e)),
        }
    }
}

async fn write_block(
    mut file: File,
    guard: OwnedMutexGuard<()>,
    block: &str,
    path: &Path,
) -> std::result::Result<(), StoreFault> {
    let result = async {
        file.write_all(block.as_bytes()).await?;
        file.flush().await
    }
    .await
    .map_err(|e| io_fault("write", path, e));

    // Closing the handle releases the file lock as well.
    let file = file.into_std().await;
    let _ = fs2::FileExt::unlock(&file);
    drop(file);
    drop(guard);
    result
}

fn io_fault(action: &str, path: &Path, err: std::io::Error) -> StoreFault {
    StoreFault::Io(format!("Failed to {action} {}: {err}", path.display()))
}
