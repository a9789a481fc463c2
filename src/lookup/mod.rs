pub mod definition;
pub mod fetch;

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use tracing::trace;

use crate::lookup::definition::Definition;

/// Blocking, infallible dictionary lookup. Failures come back as `N/A`.
pub trait DefinitionLookup: Send + Sync {
    fn lookup(&self, word: &str) -> Definition;
}

/// Identifies the presentation a lookup was issued for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupTicket {
    pub epoch: u64,
    pub word: String,
}

#[derive(Clone, Debug)]
pub struct LookupReply {
    pub ticket: LookupTicket,
    pub definition: Definition,
}

/// Non-blocking submission side used by the session controller.
pub trait LookupQueue {
    fn submit(&self, ticket: LookupTicket);
}

/// Runs each lookup on its own thread and posts the reply to a channel.
pub struct ThreadedLookup<T> {
    source: Arc<dyn DefinitionLookup>,
    tx: Sender<T>,
}

impl<T> ThreadedLookup<T>
where
    T: From<LookupReply> + Send + 'static,
{
    pub fn new(source: Arc<dyn DefinitionLookup>, tx: Sender<T>) -> Self {
        Self { source, tx }
    }
}

impl<T> LookupQueue for ThreadedLookup<T>
where
    T: From<LookupReply> + Send + 'static,
{
    fn submit(&self, ticket: LookupTicket) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let definition = source.lookup(&ticket.word);
            if tx.send(LookupReply { ticket, definition }.into()).is_err() {
                trace!("lookup reply dropped, receiver gone");
            }
        });
    }
}
