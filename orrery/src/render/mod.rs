// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Render-side bookkeeping
//!
//! The runtime does not talk to a graphics API. It hands out typed opaque
//! handles through an [`AssetSource`] and produces a per-frame draw list that
//! a backend can walk in order: opaque geometry first, then additive, then
//! alpha-blended.

mod handle;
mod queue;

pub use handle::{AssetSource, Material, Mesh, NamedAssets, ResourceHandle};
pub use queue::{BlendMode, DrawCommand, RenderQueueSystem, Renderable};
