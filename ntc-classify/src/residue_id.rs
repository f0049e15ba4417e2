use std::cmp::Ordering;
use std::cmp::Ordering::Equal;
use std::convert::TryFrom;
use std::fmt;

use crate::atom::Atom;
use crate::atom_filters::AtomPredicate;
use crate::error::ClassificationError;

/// Unique identifier for a residue: chain, author sequence number and insertion code.
///
/// Used to address a residue's atoms from a [`Structure`](crate::Structure), e.g. via the
/// [`ByResidue`](crate::atom_filters::ByResidue) predicate.
/// # Example
/// ```
/// use ntc_classify::ResidueId;
/// let res_id = ResidueId::new("A", 68, ' ');
/// assert_eq!(format!("{res_id}"), "A:68 ");
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord)]
pub struct ResidueId {
    pub chain_id: String,
    pub res_seq: i32,
    pub i_code: char,
}

impl ResidueId {
    /// Creates a new [`ResidueId`] from its properties.
    pub fn new(chain_id: &str, res_seq: i32, i_code: char) -> ResidueId {
        ResidueId { chain_id: chain_id.to_string(), res_seq, i_code }
    }
}

impl fmt::Display for ResidueId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}{}", self.chain_id, self.res_seq, self.i_code)
    }
}

impl From<&Atom> for ResidueId {
    /// Creates a [`ResidueId`] from an [`Atom`]'s auth identifiers.
    fn from(a: &Atom) -> Self {
        ResidueId { chain_id: a.auth_chain_id.clone(), res_seq: a.auth_seq_id, i_code: a.ins_code }
    }
}

impl TryFrom<&str> for ResidueId {
    type Error = ClassificationError;

    /// Creates a new [`ResidueId`] from a string definition such as `"A:68"` or `"AA:-1C"`.
    ///
    /// # Example
    /// ```
    /// # use ntc_classify::{ClassificationError, ResidueId};
    /// # fn main() -> Result<(), ClassificationError> {
    /// assert_eq!(ResidueId::try_from("A:-1")?, ResidueId::new("A", -1, ' '));
    /// assert_eq!(ResidueId::try_from("AB:123")?, ResidueId::new("AB", 123, ' '));
    /// assert_eq!(ResidueId::try_from("AA:-1C")?, ResidueId::new("AA", -1, 'C'));
    /// # Ok(())
    /// # }
    /// ```
    fn try_from(res_id: &str) -> Result<Self, Self::Error> {
        let mut parts = res_id.splitn(2, ':');
        let prefix = parts.next().ok_or(ClassificationError::InvalidArgument)?;
        let rest = parts.next().ok_or(ClassificationError::InvalidArgument)?;

        let mut num_part = String::new();
        let mut chars = rest.chars().peekable();

        if let Some(&'-') = chars.peek() {
            num_part.push('-');
            chars.next();
        }

        while let Some(&c) = chars.peek() {
            if c.is_ascii_digit() {
                num_part.push(c);
                chars.next();
            } else {
                break;
            }
        }

        let number: i32 = num_part.parse().map_err(|_e| ClassificationError::InvalidArgument)?;
        let suffix = chars.next().unwrap_or(' ');

        Ok(ResidueId::new(prefix, number, suffix))
    }
}

impl PartialEq for ResidueId {
    fn eq(&self, other: &Self) -> bool {
        self.res_seq == other.res_seq && self.chain_id == other.chain_id && self.i_code == other.i_code
    }
}

impl PartialOrd for ResidueId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.chain_id < other.chain_id {
            return Some(Ordering::Less);
        }
        if self.chain_id > other.chain_id {
            return Some(Ordering::Greater);
        }
        if self.res_seq < other.res_seq {
            return Some(Ordering::Less);
        }
        if self.res_seq > other.res_seq {
            return Some(Ordering::Greater);
        }
        if self.i_code < other.i_code {
            return Some(Ordering::Less);
        }
        if self.i_code > other.i_code {
            return Some(Ordering::Greater);
        }
        Some(Equal)
    }
}

impl AtomPredicate for ResidueId {
    fn check(&self, a: &Atom) -> bool {
        a.auth_chain_id == self.chain_id && a.auth_seq_id == self.res_seq && a.ins_code == self.i_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chain_seq_and_insertion_code() {
        assert_eq!(ResidueId::try_from("A:-1").unwrap(), ResidueId::new("A", -1, ' '));
        assert_eq!(ResidueId::try_from("AB:123").unwrap(), ResidueId::new("AB", 123, ' '));
        assert_eq!(ResidueId::try_from("AA:-1C").unwrap(), ResidueId::new("AA", -1, 'C'));
    }

    #[test]
    fn orders_by_chain_then_seq_then_icode() {
        let a = ResidueId::new("A", 1, ' ');
        let b = ResidueId::new("A", 2, ' ');
        assert!(a < b);
        let c = ResidueId::new("B", 1, ' ');
        assert!(b < c);
    }
}
