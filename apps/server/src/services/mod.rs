// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Service modules: session storage and the inference client.

pub mod inference;
pub mod store;

pub use inference::GeminiClient;
pub use store::SessionStore;
