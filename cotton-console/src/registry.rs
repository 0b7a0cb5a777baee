use crate::debug;
use crate::invocation::Request;

/// The most cloud functions one device can register
pub const MAX_FUNCTIONS: usize = 15;

/// The longest permitted function name, in bytes
pub const MAX_FUNCTION_NAME_LENGTH: usize = 64;

/// The longest permitted argument, in bytes
pub const MAX_FUNCTION_ARG_LENGTH: usize = 622;

/// A function which can be invoked remotely, by name
///
/// The single text argument is supplied by the caller, and the integer
/// result is passed straight back to it. By convention, negative
/// results indicate failure.
pub trait CloudFunction {
    /// Run the function
    fn call(&mut self, argument: &str) -> i32;
}

impl<T: CloudFunction + ?Sized> CloudFunction for &mut T {
    fn call(&mut self, argument: &str) -> i32 {
        (**self).call(argument)
    }
}

/// Errors which can arise when registering or calling functions
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    /// Functions must have names
    EmptyName,
    /// The name is longer than [`MAX_FUNCTION_NAME_LENGTH`]
    NameTooLong,
    /// A function of that name has already been registered
    AlreadyRegistered,
    /// All the slots in the registry are in use
    Full,
    /// No function of that name has been registered
    UnknownFunction,
    /// The argument is longer than [`MAX_FUNCTION_ARG_LENGTH`]
    ArgumentTooLong,
}

struct Entry<'a> {
    name: &'a str,
    function: &'a mut dyn CloudFunction,
}

/// The set of functions callable on this device
///
/// Stands in for the platform's remote-invocation dispatcher: functions
/// are registered once, at startup, and can then be called any number
/// of times by name. Storage is a fixed array of `N` slots, so no heap
/// is needed.
pub struct FunctionRegistry<'a, const N: usize = MAX_FUNCTIONS> {
    entries: [Option<Entry<'a>>; N],
}

impl<'a, const N: usize> Default for FunctionRegistry<'a, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> FunctionRegistry<'a, N> {
    /// Create a new, empty registry
    pub fn new() -> Self {
        Self {
            entries: core::array::from_fn(|_| None),
        }
    }

    /// Make `function` callable as `name`
    pub fn register(
        &mut self,
        name: &'a str,
        function: &'a mut dyn CloudFunction,
    ) -> Result<(), RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if name.len() > MAX_FUNCTION_NAME_LENGTH {
            return Err(RegistryError::NameTooLong);
        }
        if self.find(name).is_some() {
            return Err(RegistryError::AlreadyRegistered);
        }
        let slot = self
            .entries
            .iter_mut()
            .find(|e| e.is_none())
            .ok_or(RegistryError::Full)?;
        *slot = Some(Entry { name, function });
        debug::println!("registered function {}", name);
        Ok(())
    }

    /// Call the function registered as `name`
    ///
    /// On success, the result is whatever the function itself returned.
    pub fn call(
        &mut self,
        name: &str,
        argument: &str,
    ) -> Result<i32, RegistryError> {
        if argument.len() > MAX_FUNCTION_ARG_LENGTH {
            return Err(RegistryError::ArgumentTooLong);
        }
        let index = self.find(name).ok_or(RegistryError::UnknownFunction)?;
        let entry = self.entries[index]
            .as_mut()
            .ok_or(RegistryError::UnknownFunction)?;
        Ok(entry.function.call(argument))
    }

    /// Call the function named in a parsed request
    pub fn dispatch(&mut self, request: &Request) -> Result<i32, RegistryError> {
        self.call(request.name, request.argument)
    }

    /// Is a function of this name registered?
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// The number of registered functions
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Are there no registered functions?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The names of all registered functions, in registration order
    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().flatten().map(|e| e.name)
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| matches!(e, Some(e) if e.name == name))
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/registry.rs"]
mod tests;
