//! Metadata tokens identifying the nodes of an analysed module.
//!
//! Every node a rule can be evaluated against, and every location a defect can point at, is
//! identified by a 32-bit ECMA-335 token: the high byte selects the table the node lives in, the
//! low 24 bits are the 1-based row inside that table. The engine only deals with the definition
//! tables it audits, which are enumerated by [`TokenTable`].

use std::fmt;
use std::hash::{Hash, Hasher};

use strum::{Display, EnumIter};

/// Metadata tables whose rows can be addressed by the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[repr(u8)]
pub enum TokenTable {
    /// `TypeDef` table (0x02)
    TypeDef = 0x02,
    /// `Field` table (0x04)
    Field = 0x04,
    /// `MethodDef` table (0x06)
    MethodDef = 0x06,
    /// `Assembly` table (0x20)
    Assembly = 0x20,
}

impl TokenTable {
    /// Maps the high byte of a token to the table it addresses.
    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0x02 => Some(TokenTable::TypeDef),
            0x04 => Some(TokenTable::Field),
            0x06 => Some(TokenTable::MethodDef),
            0x20 => Some(TokenTable::Assembly),
            _ => None,
        }
    }
}

/// A metadata token representing a reference to a metadata table entry.
///
/// Tokens in .NET metadata consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the table type
/// - The low 24 bits (bits 0-23) indicate the row index within that table
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token for a row of the given table
    ///
    /// # Arguments
    ///
    /// * `table` - The table the row lives in
    /// * `row` - 1-based row index, truncated to 24 bits
    #[must_use]
    pub fn from_parts(table: TokenTable, row: u32) -> Self {
        Token(((table as u32) << 24) | (row & 0x00FF_FFFF))
    }

    /// Token of the `row`-th `TypeDef`
    #[must_use]
    pub fn type_def(row: u32) -> Self {
        Self::from_parts(TokenTable::TypeDef, row)
    }

    /// Token of the `row`-th `MethodDef`
    #[must_use]
    pub fn method_def(row: u32) -> Self {
        Self::from_parts(TokenTable::MethodDef, row)
    }

    /// Token of the `row`-th `Field`
    #[must_use]
    pub fn field(row: u32) -> Self {
        Self::from_parts(TokenTable::Field, row)
    }

    /// Token of the (single) `Assembly` row
    #[must_use]
    pub fn assembly() -> Self {
        Self::from_parts(TokenTable::Assembly, 1)
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Returns the table this token addresses, if the engine knows it
    #[must_use]
    pub fn table_kind(&self) -> Option<TokenTable> {
        TokenTable::from_id(self.table())
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (row 0 of any table)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.row() == 0
    }

    /// Returns true if this token addresses the given table
    #[must_use]
    pub fn is_table(&self, table: TokenTable) -> bool {
        self.table() == table as u8
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_parts() {
        assert_eq!(Token::type_def(5).value(), 0x02000005);
        assert_eq!(Token::method_def(1).value(), 0x06000001);
        assert_eq!(Token::field(0x12).value(), 0x04000012);
        assert_eq!(Token::assembly().value(), 0x20000001);
    }

    #[test]
    fn test_token_table_and_row() {
        let token = Token(0x06000001);
        assert_eq!(token.table(), 0x06);
        assert_eq!(token.row(), 1);
        assert_eq!(token.table_kind(), Some(TokenTable::MethodDef));
        assert!(token.is_table(TokenTable::MethodDef));
        assert!(!token.is_table(TokenTable::TypeDef));

        let unknown = Token(0x1B000001);
        assert_eq!(unknown.table_kind(), None);
    }

    #[test]
    fn test_token_row_is_truncated() {
        let token = Token::from_parts(TokenTable::TypeDef, 0x0100_0002);
        assert_eq!(token.table(), 0x02);
        assert_eq!(token.row(), 2);
    }

    #[test]
    fn test_token_is_null() {
        assert!(Token(0x00000000).is_null());
        assert!(Token(0x02000000).is_null());
        assert!(!Token(0x06000001).is_null());
    }

    #[test]
    fn test_token_display_and_debug() {
        let token = Token(0x06000001);
        assert_eq!(format!("{}", token), "0x06000001");

        let debug_str = format!("{:?}", token);
        assert!(debug_str.contains("Token(0x06000001"));
        assert!(debug_str.contains("table: 0x06"));
        assert!(debug_str.contains("row: 1"));
    }

    #[test]
    fn test_token_ordering() {
        assert!(Token::type_def(1) < Token::type_def(2));
        assert!(Token::type_def(9) < Token::method_def(1));
    }
}
