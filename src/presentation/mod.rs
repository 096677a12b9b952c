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

//! Render policy for the account switcher and notification rows
//!
//! Renderers are pure: they take a state snapshot plus an explicit context and
//! return a serializable view together with the intents reachable from it.

mod account_row;
mod dispatch;
mod labels;
mod notification_row;

pub use account_row::*;
pub use dispatch::{DispatchOutcome, IntentDispatcher};
pub use labels::*;
pub use notification_row::*;
