//! Framebuffer attachment management
//!
//! An attachment table tracks which surfaces are bound to the colour and
//! depth/stencil slots of one device framebuffer object, validates that
//! they can be rendered to together, and configures the device accordingly.

mod attachment_table;

pub use attachment_table::{AttachmentTable, ColorAttachment, MAX_COLOR_ATTACHMENTS, clamp_sample_count};
