use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Time-boxed exclusion list of tracker hosts.
///
/// Entries expire lazily: an entry whose expiry has passed is removed the next
/// time the host is checked. All methods take the current instant so expiry
/// can be tested without sleeping.
#[derive(Debug)]
pub struct Blacklist {
    entries: HashMap<String, Instant>,
    duration: Duration,
}

impl Blacklist {
    pub fn new(duration: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            duration,
        }
    }

    /// Returns true if `host` is still blacklisted at `now`.
    ///
    /// An expired entry is removed before returning false.
    pub fn is_bad(&mut self, host: &str, now: Instant) -> bool {
        match self.entries.get(host) {
            Some(&expiry) if expiry <= now => {
                self.entries.remove(host);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Blacklists `host` until `now + duration`.
    ///
    /// A host that is already blacklisted keeps its original expiry.
    pub fn mark_bad(&mut self, host: &str, now: Instant) {
        if !self.is_bad(host, now) {
            self.entries.insert(host.to_string(), now + self.duration);
        }
    }

    /// Removes `host` from the blacklist. No-op if it isn't listed.
    pub fn mark_alive(&mut self, host: &str) {
        self.entries.remove(host);
    }

    /// Expiry of the entry for `host`, expired or not.
    pub fn expiry(&self, host: &str) -> Option<Instant> {
        self.entries.get(host).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
