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
//! Typed resource handles

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Tag for mesh handles
#[derive(Debug)]
pub enum Mesh {}

/// Tag for material handles
#[derive(Debug)]
pub enum Material {}

/// Index into a backend resource table, tagged with the resource kind
///
/// The default handle is null and refers to nothing.
pub struct ResourceHandle<T> {
    value: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ResourceHandle<T> {
    const NULL: usize = usize::MAX;

    /// Wrap a backend index
    pub fn new(value: usize) -> Self {
        ResourceHandle {
            value,
            _marker: PhantomData,
        }
    }

    /// The null handle
    pub fn null() -> Self {
        Self::new(Self::NULL)
    }

    /// Whether this is the null handle
    pub fn is_null(&self) -> bool {
        self.value == Self::NULL
    }

    /// Backend index, or `None` for the null handle
    pub fn index(&self) -> Option<usize> {
        (!self.is_null()).then_some(self.value)
    }
}

impl<T> Default for ResourceHandle<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> Clone for ResourceHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ResourceHandle<T> {}

impl<T> PartialEq for ResourceHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for ResourceHandle<T> {}

impl<T> Hash for ResourceHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for ResourceHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = std::any::type_name::<T>().rsplit("::").next().unwrap_or("?");
        match self.index() {
            Some(index) => write!(f, "ResourceHandle<{}>({})", kind, index),
            None => write!(f, "ResourceHandle<{}>(null)", kind),
        }
    }
}

/// Supplier of mesh and material handles for scene construction
pub trait AssetSource {
    /// Handle for the mesh called `name`
    fn mesh(&mut self, name: &str) -> ResourceHandle<Mesh>;

    /// Handle for the material called `name`
    fn material(&mut self, name: &str) -> ResourceHandle<Material>;
}

/// Asset source that interns names and hands out sequential handles
///
/// Asking for the same name twice returns the same handle. Useful headless
/// and in tests, where no backend owns the resources.
#[derive(Debug, Default)]
pub struct NamedAssets {
    meshes: Interner,
    materials: Interner,
}

impl NamedAssets {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Name behind a mesh handle
    pub fn mesh_name(&self, handle: ResourceHandle<Mesh>) -> Option<&str> {
        self.meshes.name(handle.index()?)
    }

    /// Name behind a material handle
    pub fn material_name(&self, handle: ResourceHandle<Material>) -> Option<&str> {
        self.materials.name(handle.index()?)
    }

    /// Number of distinct meshes handed out
    pub fn mesh_count(&self) -> usize {
        self.meshes.names.len()
    }

    /// Number of distinct materials handed out
    pub fn material_count(&self) -> usize {
        self.materials.names.len()
    }
}

impl AssetSource for NamedAssets {
    fn mesh(&mut self, name: &str) -> ResourceHandle<Mesh> {
        ResourceHandle::new(self.meshes.intern(name))
    }

    fn material(&mut self, name: &str) -> ResourceHandle<Material> {
        ResourceHandle::new(self.materials.intern(name))
    }
}

#[derive(Debug, Default)]
struct Interner {
    names: Vec<String>,
    lookup: HashMap<String, usize>,
}

impl Interner {
    fn intern(&mut self, name: &str) -> usize {
        if let Some(&index) = self.lookup.get(name) {
            return index;
        }
        let index = self.names.len();
        self.names.push(name.to_string());
        self.lookup.insert(name.to_string(), index);
        index
    }

    fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }
}
