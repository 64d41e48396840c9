//! Heap object kinds.

use std::borrow::Cow;
use std::fmt;
use std::mem::size_of;

use super::hash::hash_bytes;
use super::map::{MapObj, MapSlot};
use super::{Arity, ObjRef, Value, ValueType};
use crate::native::NativeFn;

/// A garbage-collected object.
#[derive(Debug)]
pub enum Object {
    String(StringObj),
    List(ListObj),
    Map(MapObj),
    Range(RangeObj),
    Function(FunctionObj),
    Script(ScriptObj),
    Fiber(FiberObj),
    User(UserObj),
}

impl Object {
    pub fn value_type(&self) -> ValueType {
        match self {
            Object::String(_) => ValueType::String,
            Object::List(_) => ValueType::List,
            Object::Map(_) => ValueType::Map,
            Object::Range(_) => ValueType::Range,
            Object::Function(_) => ValueType::Function,
            Object::Script(_) => ValueType::Script,
            Object::Fiber(_) => ValueType::Fiber,
            Object::User(_) => ValueType::UserObj,
        }
    }

    /// Approximate number of bytes this object accounts for on the heap.
    pub(crate) fn heap_size(&self) -> usize {
        let payload = match self {
            Object::String(s) => s.len(),
            Object::List(l) => l.elements.capacity() * size_of::<Value>(),
            Object::Map(m) => m.capacity() * size_of::<MapSlot>(),
            Object::Range(_) => 0,
            Object::Function(f) => {
                f.name.len()
                    + match &f.body {
                        FunctionBody::Native(_) => 0,
                        FunctionBody::Code(code) => code.len(),
                    }
            }
            Object::Script(s) => {
                s.name.len()
                    + s.functions.capacity() * size_of::<ObjRef>()
                    + s.globals.capacity() * size_of::<Global>()
            }
            Object::Fiber(f) => f.stack.capacity() * size_of::<Value>(),
            Object::User(u) => u.type_name.len(),
        };
        size_of::<Object>() + payload
    }

    /// Push every object directly reachable from this one.
    pub(crate) fn trace(&self, gray: &mut Vec<ObjRef>) {
        let mut push = |value: Value| {
            if let Value::Object(r) = value {
                gray.push(r);
            }
        };
        match self {
            Object::String(_) | Object::Range(_) | Object::User(_) => {}
            Object::List(l) => l.elements.iter().copied().for_each(&mut push),
            Object::Map(m) => {
                for (key, value) in m.entries() {
                    push(key);
                    push(value);
                }
            }
            Object::Function(f) => {
                if let Some(owner) = f.owner {
                    push(Value::Object(owner));
                }
            }
            Object::Script(s) => {
                s.functions
                    .iter()
                    .for_each(|&function| push(Value::Object(function)));
                s.globals.iter().for_each(|global| push(global.value));
            }
            Object::Fiber(f) => {
                f.stack.iter().copied().for_each(&mut push);
                if let Some(function) = f.function {
                    push(Value::Object(function));
                }
            }
        }
    }
}

/// Immutable byte string with a cached content hash.
///
/// The only constructor computes the hash, so any derived string (case
/// conversion, concatenation, slicing) carries a hash that matches its
/// content before anyone can observe it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringObj {
    bytes: Box<[u8]>,
    hash: u32,
}

impl StringObj {
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        let bytes = bytes.into();
        let hash = hash_bytes(&bytes);
        StringObj { bytes, hash }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn hash(&self) -> u32 {
        self.hash
    }

    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ListObj {
    pub elements: Vec<Value>,
}

/// Half-open numeric range; see the iteration protocol for direction rules.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeObj {
    pub from: f64,
    pub to: f64,
}

/// What runs when a function is called.
pub enum FunctionBody {
    Native(NativeFn),
    /// Compiled code handed over by the compiler; opaque to this layer.
    Code(Box<[u8]>),
}

impl FunctionBody {
    pub fn as_native(&self) -> Option<NativeFn> {
        match self {
            FunctionBody::Native(native) => Some(*native),
            FunctionBody::Code(_) => None,
        }
    }
}

impl fmt::Debug for FunctionBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionBody::Native(_) => f.write_str("Native"),
            FunctionBody::Code(code) => write!(f, "Code({} bytes)", code.len()),
        }
    }
}

/// Callable exposed to scripts.
#[derive(Debug)]
pub struct FunctionObj {
    pub name: String,
    /// Module that declared the function; `None` for global builtins.
    pub owner: Option<ObjRef>,
    pub arity: Arity,
    pub body: FunctionBody,
}

/// Named global slot of a script.
#[derive(Clone, Debug)]
pub struct Global {
    pub name: String,
    pub value: Value,
}

/// A module namespace: declared functions and globals.
#[derive(Debug, Default)]
pub struct ScriptObj {
    pub name: String,
    pub functions: Vec<ObjRef>,
    pub globals: Vec<Global>,
}

impl ScriptObj {
    pub fn new(name: impl Into<String>) -> Self {
        ScriptObj {
            name: name.into(),
            functions: Vec::new(),
            globals: Vec::new(),
        }
    }

    pub fn global_index(&self, name: &str) -> Option<usize> {
        self.globals.iter().position(|global| global.name == name)
    }

    pub fn global(&self, name: &str) -> Option<Value> {
        self.global_index(name).map(|index| self.globals[index].value)
    }
}

/// Execution context. Only the value stack (argument/return windows of
/// native calls) matters to this layer.
#[derive(Debug, Default)]
pub struct FiberObj {
    pub stack: Vec<Value>,
    pub function: Option<ObjRef>,
}

/// Opaque host object.
#[derive(Clone, Debug)]
pub struct UserObj {
    pub type_name: String,
    pub tag: u64,
}
