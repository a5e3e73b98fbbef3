// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod browser;
pub mod browser_crawler;
pub mod catalog;
pub mod chromium;
pub mod dispatcher;
pub mod http_crawler;
pub mod profile;
pub mod scroll;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod traits;
