//! Single-consumer message loop.

use crate::config::state::SheetIdStore;
use crate::core::router::Router;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::sheets::SheetsBackend;
use crate::transport::ChatTransport;
use std::thread;
use std::time::Duration;

const POLL_BACKOFF: Duration = Duration::from_secs(5);

pub struct Bot<T: ChatTransport, B: SheetsBackend, S: SheetIdStore> {
    transport: T,
    router: Router<B, S>,
    audit: Option<DbPool>,
}

impl<T: ChatTransport, B: SheetsBackend, S: SheetIdStore> Bot<T, B, S> {
    pub fn new(transport: T, router: Router<B, S>, audit: Option<DbPool>) -> Self {
        Self {
            transport,
            router,
            audit,
        }
    }

    pub fn router(&self) -> &Router<B, S> {
        &self.router
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Poll once and handle every message in the batch, in order.
    /// Returns how many messages produced a reply.
    pub fn run_once(&mut self) -> crate::errors::AppResult<usize> {
        let batch = self.transport.poll()?;
        let mut handled = 0;

        for msg in &batch {
            let Some(outcome) = self.router.handle(msg) else {
                continue;
            };
            handled += 1;

            if let Err(e) = self.transport.reply(msg, &outcome.reply_text()) {
                tracing::warn!(chat = msg.chat_id, error = %e, "failed to send reply");
            }

            if let Some(pool) = &self.audit {
                let (op, target, message) = outcome.audit();
                let target = if target.is_empty() {
                    msg.sender_id.to_string()
                } else {
                    target
                };
                if let Err(e) = ttlog(&pool.conn, op, &target, &message) {
                    tracing::warn!(error = %e, "failed to write audit log");
                }
            }
        }

        Ok(handled)
    }

    /// Run forever; transport errors are logged and retried after a pause.
    pub fn run(&mut self) -> ! {
        loop {
            if let Err(e) = self.run_once() {
                tracing::error!(error = %e, "polling failed, retrying in {}s", POLL_BACKOFF.as_secs());
                thread::sleep(POLL_BACKOFF);
            }
        }
    }
}
