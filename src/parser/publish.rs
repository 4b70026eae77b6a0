//! Hand-off of finished pages from the parse thread to readers.
//!
//! A page is built on one thread through `&mut PageText`; only
//! [`PageText::publish`] makes it shareable. Sending the shared page over the
//! channel orders construction before every read on the receiving side.

use crossbeam_channel::{Receiver, Sender};

use crate::error::{Error, Result};
use crate::model::{PageText, SharedPage};

/// A finished page tagged with its page number (1-indexed).
#[derive(Debug, Clone)]
pub struct PublishedPage {
    pub number: u32,
    pub page: SharedPage,
}

/// Sending half, owned by the parse thread.
#[derive(Debug, Clone)]
pub struct PagePublisher {
    sender: Sender<PublishedPage>,
}

impl PagePublisher {
    /// Sort `page`, wrap it and send it to the readers.
    ///
    /// Returns the shared handle so the parse side can keep a reference.
    pub fn publish(&self, number: u32, page: PageText) -> Result<SharedPage> {
        let shared = page.publish();
        self.sender
            .send(PublishedPage {
                number,
                page: shared.clone(),
            })
            .map_err(|_| Error::Disconnected)?;
        log::debug!("published page {}", number);
        Ok(shared)
    }
}

/// Run `f` on a shared page under its write lock.
///
/// Selection changes and reading-order rebuilds both need the write lock.
pub fn with_page<R, F>(page: &SharedPage, f: F) -> Result<R>
where
    F: FnOnce(&mut PageText) -> R,
{
    let mut guard = page.write().map_err(|_| Error::Poisoned)?;
    Ok(f(&mut guard))
}

/// Create an unbounded page channel.
pub fn channel() -> (PagePublisher, Receiver<PublishedPage>) {
    let (sender, receiver) = crossbeam_channel::unbounded();
    (PagePublisher { sender }, receiver)
}
