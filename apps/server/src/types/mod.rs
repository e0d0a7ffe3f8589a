// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Type definitions for API responses.

mod response;

pub use response::{DocumentInfo, PageInfo, RenderInfo, RenderResult, SessionSnapshot};
