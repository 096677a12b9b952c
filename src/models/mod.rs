// Switchboard - An accessibility-first Mastodon client
// Copyright (C) 2025 Switchboard Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Data models for Switchboard
//!
//! These models represent the accounts, statuses and notifications the rows are
//! built from, the view building blocks handed to the UI, and IPC messages.

mod account;
mod ipc_message;
mod notification;
mod post;
mod text;
mod user;
mod view;

pub use account::*;
pub use ipc_message::*;
pub use notification::*;
pub use post::*;
pub use text::*;
pub use user::*;
pub use view::*;
