//! Append-only conversation history.

use crate::form::FormBlock;
use crate::form::FormDescription;
use crate::form::FormId;

/// Position of an item in the transcript. Stable for the life of the
/// transcript because nothing is ever removed or reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptItem {
    Message { role: Role, content: String },
    Form(FormBlock),
}

impl TranscriptItem {
    pub fn as_message(&self) -> Option<(Role, &str)> {
        match self {
            TranscriptItem::Message { role, content } => Some((*role, content.as_str())),
            TranscriptItem::Form(_) => None,
        }
    }

    pub fn as_form(&self) -> Option<&FormBlock> {
        match self {
            TranscriptItem::Form(form) => Some(form),
            TranscriptItem::Message { .. } => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Transcript {
    items: Vec<TranscriptItem>,
    next_form_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> EntryId {
        self.push(TranscriptItem::Message {
            role: Role::User,
            content: content.into(),
        })
    }

    pub fn push_bot(&mut self, content: impl Into<String>) -> EntryId {
        self.push(TranscriptItem::Message {
            role: Role::Bot,
            content: content.into(),
        })
    }

    /// Append a new live form block built from `description`. Earlier forms
    /// stay where they are and keep working.
    pub fn push_form(&mut self, description: FormDescription) -> (EntryId, FormId) {
        self.next_form_id += 1;
        let form_id = FormId(self.next_form_id);
        let entry = self.push(TranscriptItem::Form(FormBlock::new(form_id, description)));
        (entry, form_id)
    }

    fn push(&mut self, item: TranscriptItem) -> EntryId {
        self.items.push(item);
        EntryId(self.items.len() - 1)
    }

    pub fn items(&self) -> &[TranscriptItem] {
        &self.items
    }

    pub fn get(&self, id: EntryId) -> Option<&TranscriptItem> {
        self.items.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last_entry(&self) -> Option<EntryId> {
        self.items.len().checked_sub(1).map(EntryId)
    }

    pub fn form(&self, id: FormId) -> Option<&FormBlock> {
        self.items
            .iter()
            .filter_map(TranscriptItem::as_form)
            .find(|f| f.id() == id)
    }

    /// Mutable access to exactly one form block. Message entries are never
    /// handed out mutably.
    pub fn form_mut(&mut self, id: FormId) -> Option<&mut FormBlock> {
        self.items.iter_mut().find_map(|item| match item {
            TranscriptItem::Form(form) if form.id() == id => Some(form),
            _ => None,
        })
    }

    pub fn entry_of_form(&self, id: FormId) -> Option<EntryId> {
        self.items
            .iter()
            .position(|item| item.as_form().is_some_and(|f| f.id() == id))
            .map(EntryId)
    }

    /// Form ids in transcript order, oldest first.
    pub fn form_ids(&self) -> Vec<FormId> {
        self.items
            .iter()
            .filter_map(TranscriptItem::as_form)
            .map(FormBlock::id)
            .collect()
    }

    pub fn latest_form(&self) -> Option<FormId> {
        self.items
            .iter()
            .rev()
            .find_map(TranscriptItem::as_form)
            .map(FormBlock::id)
    }
}
