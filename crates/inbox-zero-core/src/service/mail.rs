//! Mail service for IMAP operations.
//!
//! Every function opens its own session from the supplied config, does its
//! work and logs out before returning, whatever the outcome. Nothing is
//! cached or shared between calls.

use std::path::{Path, PathBuf};

use inbox_zero_imap::{FetchedMessage, MailSession};

use crate::config::ConnectionConfig;
use crate::mapper::{self, AttachmentPayload};
use crate::model::{EmailRecord, MessageUid};
use crate::{MailError, Result};

/// Folder messages are moved to when archived.
pub const DEFAULT_ARCHIVE_FOLDER: &str = "Archive";

/// Opens a session on `folder`, classifying failures for the caller.
///
/// An invalid config is rejected before any connection is attempted.
async fn open_session(config: &ConnectionConfig, folder: &str) -> Result<MailSession> {
    config.validate().map_err(MailError::InvalidConfig)?;

    MailSession::open(&config.session_config(), &config.credentials(), folder)
        .await
        .map_err(|e| {
            MailError::on_open(e, config.host(), config.port(), config.username(), folder)
        })
}

/// Fetches the first `limit` messages of `folder` in server order.
///
/// `None` fetches the whole folder. An empty folder yields an empty vector.
///
/// # Errors
///
/// Returns an error if the session cannot be opened, the fetch fails, or a
/// message comes back without a UID.
pub async fn fetch_first(
    config: &ConnectionConfig,
    folder: &str,
    limit: Option<u32>,
) -> Result<Vec<EmailRecord>> {
    let mut session = open_session(config, folder).await?;
    let fetched = session.fetch_first(limit).await;
    session.close().await;

    let records = fetched?
        .iter()
        .map(mapper::to_record)
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(folder, count = records.len(), "Loaded messages");
    Ok(records)
}

/// Moves the message `uid` from `folder` to `archive_folder`.
///
/// There is no existence check: the result is whatever the server reports
/// for the move. A server refusal yields `Ok(false)`.
///
/// # Errors
///
/// Returns [`MailError::DataIntegrity`] without contacting the server if
/// `uid` is not a single nonzero UID, or an error if the session cannot be
/// opened or the connection fails during the move.
pub async fn archive_by_uid(
    config: &ConnectionConfig,
    folder: &str,
    uid: &MessageUid,
    archive_folder: &str,
) -> Result<bool> {
    let uid = uid.server_uid().ok_or_else(|| {
        MailError::DataIntegrity(format!("{:?} is not a single server UID", uid.as_str()))
    })?;

    let mut session = open_session(config, folder).await?;
    let moved = session.uid_move(uid, archive_folder).await;
    session.close().await;

    move_outcome(moved, folder, uid, archive_folder)
}

/// Moves whatever message is currently first in `folder` to `archive_folder`.
///
/// The folder is re-fetched, so this may not be the message a caller showed
/// earlier if the mailbox changed in between. Returns `Ok(false)` when the
/// folder is empty.
///
/// # Errors
///
/// Same as [`archive_by_uid`], plus [`MailError::DataIntegrity`] if the first
/// message has no UID.
pub async fn archive_first(
    config: &ConnectionConfig,
    folder: &str,
    archive_folder: &str,
) -> Result<bool> {
    let mut session = open_session(config, folder).await?;
    let outcome = move_first(&mut session, archive_folder).await;
    session.close().await;
    outcome
}

async fn move_first(session: &mut MailSession, archive_folder: &str) -> Result<bool> {
    let Some(first) = session.fetch_first(Some(1)).await?.into_iter().next() else {
        tracing::info!(folder = session.folder(), "Folder is empty, nothing to archive");
        return Ok(false);
    };

    let uid = first.uid.filter(|uid| *uid > 0).ok_or_else(|| {
        MailError::DataIntegrity(format!(
            "message {} was fetched without a server UID",
            first.seq
        ))
    })?;

    let moved = session.uid_move(uid, archive_folder).await;
    move_outcome(moved, session.folder(), uid, archive_folder)
}

fn move_outcome(
    moved: inbox_zero_imap::Result<()>,
    folder: &str,
    uid: u32,
    archive_folder: &str,
) -> Result<bool> {
    match moved {
        Ok(()) => {
            tracing::info!(folder, uid, archive_folder, "Message archived");
            Ok(true)
        }
        Err(e) if e.is_rejection() => {
            tracing::warn!(
                ?e,
                folder,
                uid,
                archive_folder,
                "Server refused to archive message"
            );
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Saves every named attachment of every message in `folder` to `save_dir`.
///
/// `save_dir` is created if needed. Files are written in message order, then
/// MIME order; two attachments with the same name overwrite each other and
/// the last one wins. Directory components in attachment names are dropped.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be written, or if the
/// session fails.
pub async fn download_attachments(
    config: &ConnectionConfig,
    folder: &str,
    save_dir: &Path,
) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(save_dir)
        .await
        .map_err(|source| MailError::Storage {
            path: save_dir.to_path_buf(),
            source,
        })?;

    let mut session = open_session(config, folder).await?;
    let fetched = session.fetch_first(None).await;
    session.close().await;

    let messages = fetched?;
    let mut saved = Vec::new();
    for message in &messages {
        saved.extend(save_attachments(message, save_dir).await?);
    }

    tracing::info!(folder, count = saved.len(), dir = %save_dir.display(), "Saved attachments");
    Ok(saved)
}

async fn save_attachments(message: &FetchedMessage, save_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut saved = Vec::new();
    for AttachmentPayload {
        file_name,
        contents,
    } in mapper::attachments(message)
    {
        let Some(path) = attachment_path(save_dir, &file_name) else {
            tracing::warn!(
                file_name = %file_name,
                seq = message.seq,
                "Skipping attachment with unusable name"
            );
            continue;
        };

        tokio::fs::write(&path, &contents)
            .await
            .map_err(|source| MailError::Storage {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), size = contents.len(), "Attachment written");
        saved.push(path);
    }
    Ok(saved)
}

/// Joins the last component of `file_name` onto `save_dir`.
fn attachment_path(save_dir: &Path, file_name: &str) -> Option<PathBuf> {
    let name = file_name.rsplit(['/', '\\']).next()?;
    match name {
        "" | "." | ".." => None,
        name => Some(save_dir.join(name)),
    }
}
