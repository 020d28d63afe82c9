pub mod attachment;
pub mod branch;
pub mod customer;
pub mod history;
pub mod personnel;
pub mod protocol;
pub mod protocol_type;
pub mod reminder;
pub mod status;
pub mod user;

pub use attachment::{AttachmentView, NewAttachment, ProtocolAttachment};
pub use branch::{Branch, BranchInput};
pub use customer::{Customer, CustomerInput};
pub use history::{HistoryEntry, NewHistoryEntry, ProtocolHistory};
pub use personnel::{PersonnelInput, SalesPersonnel};
pub use protocol::{InvalidPriority, Priority, Protocol, ProtocolView};
pub use protocol_type::{ProtocolType, ProtocolTypeInput};
pub use reminder::{NewReminder, ProtocolReminder, ReminderPatch, ReminderView};
pub use status::{ProtocolStatus, StatusInput};
pub use user::User;
