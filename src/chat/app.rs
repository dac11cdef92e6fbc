//! Chat controller
//!
//! `ChatApp` owns all session state (slot store, message store, identity
//! and view) and turns UI events into the load → mutate → persist → redraw
//! cycle. Each event runs to completion before the next is handled.

use crate::chat::identity::{IdentityError, IdentityManager};
use crate::chat::render::{ChatView, DisplayList, ViewRenderer};
use crate::chat::store::ChatStore;
use crate::chat::types::Message;
use crate::error::ChatResult;
use crate::storage::SlotStore;

/// A user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Send control activated with the given input text
    SendMessage(String),
    /// Username confirm control activated with the given input text
    SubmitUsername(String),
}

/// What handling an event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Message appended, persisted and rendered
    Sent,
    /// Empty message, nothing happened
    Ignored,
    /// No display name yet; the user was prompted instead
    NeedsUsername,
    /// Display name stored
    UsernameSet,
    /// Display name refused; the view shows why
    UsernameRejected,
}

/// Event-driven chat session over a slot store and a view
pub struct ChatApp<S, V> {
    slots: S,
    view: V,
    renderer: ViewRenderer,
    store: ChatStore,
    identity: IdentityManager,
}

impl<S: SlotStore, V: ChatView> ChatApp<S, V> {
    /// Load persisted state, draw once and prompt for a name if needed
    pub fn start(slots: S, view: V, renderer: ViewRenderer) -> ChatResult<Self> {
        let store = ChatStore::load(&slots);
        let identity = IdentityManager::load(&slots);

        tracing::debug!(
            messages = store.len(),
            identified = !identity.needs_prompt(),
            "Chat session started"
        );

        let mut app = Self {
            slots,
            view,
            renderer,
            store,
            identity,
        };

        app.redraw()?;
        if app.identity.needs_prompt() {
            app.view.prompt_username()?;
        }

        Ok(app)
    }

    /// Dispatch one UI event
    pub fn handle(&mut self, event: ChatEvent) -> ChatResult<EventOutcome> {
        match event {
            ChatEvent::SendMessage(text) => self.send_message(&text),
            ChatEvent::SubmitUsername(name) => self.submit_username(&name),
        }
    }

    /// Append `text` as the current user, persist and redraw
    pub fn send_message(&mut self, text: &str) -> ChatResult<EventOutcome> {
        if text.trim().is_empty() {
            return Ok(EventOutcome::Ignored);
        }

        let Some(user) = self.identity.resolve() else {
            self.view.prompt_username()?;
            return Ok(EventOutcome::NeedsUsername);
        };

        if self.store.append(&mut self.slots, user, text)?.is_none() {
            return Ok(EventOutcome::Ignored);
        }

        self.redraw()?;
        Ok(EventOutcome::Sent)
    }

    /// Validate and store a display name, then redraw
    pub fn submit_username(&mut self, name: &str) -> ChatResult<EventOutcome> {
        match self.identity.set(&mut self.slots, name) {
            Ok(()) => {
                self.redraw()?;
                Ok(EventOutcome::UsernameSet)
            }
            Err(e @ (IdentityError::EmptyName | IdentityError::AlreadySet(_))) => {
                self.view.show_validation_error(&e.to_string())?;
                Ok(EventOutcome::UsernameRejected)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Current display list, without drawing it
    pub fn display_list(&self) -> DisplayList {
        self.renderer
            .render(self.store.messages(), self.identity.resolve())
    }

    fn redraw(&mut self) -> ChatResult<()> {
        let list = self.display_list();
        self.view.render(&list)?;
        Ok(())
    }

    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    pub fn current_user(&self) -> Option<&str> {
        self.identity.resolve()
    }

    pub fn needs_username(&self) -> bool {
        self.identity.needs_prompt()
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::render::{Side, TimeDisplay};
    use crate::error::ChatError;
    use crate::storage::{
        FileSlotStore, MemorySlotStore, ReadOnlySlots, StorageError, MESSAGES_KEY, USERNAME_KEY,
    };
    use tempfile::tempdir;

    /// View that records every call
    #[derive(Default)]
    struct RecordingView {
        renders: Vec<DisplayList>,
        prompts: usize,
        errors: Vec<String>,
    }

    impl ChatView for RecordingView {
        fn render(&mut self, list: &DisplayList) -> std::io::Result<()> {
            self.renders.push(list.clone());
            Ok(())
        }

        fn prompt_username(&mut self) -> std::io::Result<()> {
            self.prompts += 1;
            Ok(())
        }

        fn show_validation_error(&mut self, message: &str) -> std::io::Result<()> {
            self.errors.push(message.to_string());
            Ok(())
        }
    }

    fn start(slots: MemorySlotStore) -> ChatApp<MemorySlotStore, RecordingView> {
        ChatApp::start(
            slots,
            RecordingView::default(),
            ViewRenderer::new(TimeDisplay::Utc),
        )
        .unwrap()
    }

    #[test]
    fn test_start_prompts_when_unset() {
        let app = start(MemorySlotStore::new());

        assert!(app.needs_username());
        assert_eq!(app.view().prompts, 1);
        assert_eq!(app.view().renders.len(), 1);
        assert!(app.view().renders[0].is_empty());
    }

    #[test]
    fn test_start_with_stored_identity() {
        let slots = MemorySlotStore::new()
            .with_slot(USERNAME_KEY, "Alice")
            .with_slot(
                MESSAGES_KEY,
                r#"[{"username":"Bob","text":"hey","timestamp":0}]"#,
            );
        let app = start(slots);

        assert_eq!(app.current_user(), Some("Alice"));
        assert_eq!(app.view().prompts, 0);
        assert_eq!(app.view().renders[0].entries[0].side, Side::Other);
    }

    #[test]
    fn test_send_appends_and_persists() {
        let mut app = start(MemorySlotStore::new().with_slot(USERNAME_KEY, "Alice"));

        let outcome = app.handle(ChatEvent::SendMessage("hi".into())).unwrap();
        assert_eq!(outcome, EventOutcome::Sent);

        assert_eq!(app.messages().len(), 1);
        assert_eq!(app.messages()[0].author, "Alice");
        assert_eq!(app.messages()[0].body, "hi");

        let reloaded = ChatStore::load(app.slots());
        assert_eq!(reloaded.messages(), app.messages());

        let last = app.view().renders.last().unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last.entries[0].side, Side::Own);
        assert_eq!(last.scroll_to, Some(0));
    }

    #[test]
    fn test_send_empty_is_ignored() {
        let mut app = start(MemorySlotStore::new().with_slot(USERNAME_KEY, "Alice"));
        let renders_before = app.view().renders.len();

        for text in ["", "   ", "\n"] {
            let outcome = app.send_message(text).unwrap();
            assert_eq!(outcome, EventOutcome::Ignored);
        }

        assert!(app.messages().is_empty());
        assert_eq!(app.view().renders.len(), renders_before);
        assert_eq!(app.slots().get(MESSAGES_KEY).unwrap(), None);
    }

    #[test]
    fn test_send_without_identity_reprompts() {
        let mut app = start(MemorySlotStore::new());

        let outcome = app.send_message("hello?").unwrap();
        assert_eq!(outcome, EventOutcome::NeedsUsername);
        assert_eq!(app.view().prompts, 2);
        assert!(app.messages().is_empty());
    }

    #[test]
    fn test_empty_username_shows_error() {
        let mut app = start(MemorySlotStore::new());

        let outcome = app.handle(ChatEvent::SubmitUsername("  ".into())).unwrap();
        assert_eq!(outcome, EventOutcome::UsernameRejected);
        assert!(app.needs_username());
        assert_eq!(app.view().errors, vec!["Please enter a valid name.".to_string()]);
        assert_eq!(app.slots().get(USERNAME_KEY).unwrap(), None);
    }

    #[test]
    fn test_username_then_send() {
        let mut app = start(MemorySlotStore::new());

        assert_eq!(
            app.submit_username("Bob").unwrap(),
            EventOutcome::UsernameSet
        );
        assert_eq!(app.current_user(), Some("Bob"));
        assert_eq!(app.send_message("hi all").unwrap(), EventOutcome::Sent);

        assert_eq!(app.messages()[0].author, "Bob");
        assert_eq!(app.view().prompts, 1);
    }

    #[test]
    fn test_second_username_rejected() {
        let mut app = start(MemorySlotStore::new().with_slot(USERNAME_KEY, "Bob"));

        let outcome = app.submit_username("Robert").unwrap();
        assert_eq!(outcome, EventOutcome::UsernameRejected);
        assert_eq!(app.current_user(), Some("Bob"));
        assert_eq!(app.view().errors.len(), 1);
    }

    #[test]
    fn test_session_survives_restart() {
        let dir = tempdir().unwrap();

        {
            let slots = FileSlotStore::open(dir.path()).unwrap();
            let mut app =
                ChatApp::start(slots, RecordingView::default(), ViewRenderer::default()).unwrap();
            app.submit_username("Bob").unwrap();
            app.send_message("see you tomorrow").unwrap();
        }

        let slots = FileSlotStore::open(dir.path()).unwrap();
        let app =
            ChatApp::start(slots, RecordingView::default(), ViewRenderer::default()).unwrap();

        assert_eq!(app.current_user(), Some("Bob"));
        assert_eq!(app.view().prompts, 0);
        assert_eq!(app.messages().len(), 1);
        assert_eq!(app.view().renders[0].entries[0].side, Side::Own);
    }

    #[test]
    fn test_username_storage_failure_propagates() {
        let mut app = ChatApp::start(
            ReadOnlySlots,
            RecordingView::default(),
            ViewRenderer::new(TimeDisplay::Utc),
        )
        .unwrap();
        let renders_before = app.view().renders.len();

        let err = app.submit_username("Bob").unwrap_err();
        assert!(matches!(
            err,
            ChatError::Identity(IdentityError::Storage(StorageError::Io(_)))
        ));
        assert!(app.needs_username());
        assert!(app.view().errors.is_empty());
        assert_eq!(app.view().renders.len(), renders_before);
    }
}
