use std::fmt::{self, Display, Formatter};

/// A SQL type code as reported by a JDBC driver's metadata facility (`java.sql.Types`).
///
/// Codes outside the named constants are preserved as-is; they simply have no
/// [`TypeFamily`] and so no generic default-value casting rule.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SqlType(pub i32);

/// The native representation family a [`SqlType`] casts its default value into.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    Boolean,
    Integer,
    Float,
    Decimal,
    Text,
    Date,
    Time,
    Timestamp,
    Binary,
}

impl SqlType {
    pub const BIT: SqlType = SqlType(-7);
    pub const TINYINT: SqlType = SqlType(-6);
    pub const SMALLINT: SqlType = SqlType(5);
    pub const INTEGER: SqlType = SqlType(4);
    pub const BIGINT: SqlType = SqlType(-5);
    pub const FLOAT: SqlType = SqlType(6);
    pub const REAL: SqlType = SqlType(7);
    pub const DOUBLE: SqlType = SqlType(8);
    pub const NUMERIC: SqlType = SqlType(2);
    pub const DECIMAL: SqlType = SqlType(3);
    pub const CHAR: SqlType = SqlType(1);
    pub const VARCHAR: SqlType = SqlType(12);
    pub const LONGVARCHAR: SqlType = SqlType(-1);
    pub const DATE: SqlType = SqlType(91);
    pub const TIME: SqlType = SqlType(92);
    pub const TIMESTAMP: SqlType = SqlType(93);
    pub const BINARY: SqlType = SqlType(-2);
    pub const VARBINARY: SqlType = SqlType(-3);
    pub const LONGVARBINARY: SqlType = SqlType(-4);
    pub const NULL: SqlType = SqlType(0);
    pub const OTHER: SqlType = SqlType(1111);
    pub const JAVA_OBJECT: SqlType = SqlType(2000);
    pub const DISTINCT: SqlType = SqlType(2001);
    pub const STRUCT: SqlType = SqlType(2002);
    pub const ARRAY: SqlType = SqlType(2003);
    pub const BLOB: SqlType = SqlType(2004);
    pub const CLOB: SqlType = SqlType(2005);
    pub const REF: SqlType = SqlType(2006);
    pub const DATALINK: SqlType = SqlType(70);
    pub const BOOLEAN: SqlType = SqlType(16);
    pub const ROWID: SqlType = SqlType(-8);
    pub const NCHAR: SqlType = SqlType(-15);
    pub const NVARCHAR: SqlType = SqlType(-9);
    pub const LONGNVARCHAR: SqlType = SqlType(-16);
    pub const NCLOB: SqlType = SqlType(2011);
    pub const SQLXML: SqlType = SqlType(2009);
    pub const TIME_WITH_TIMEZONE: SqlType = SqlType(2013);
    pub const TIMESTAMP_WITH_TIMEZONE: SqlType = SqlType(2014);

    /// The raw `java.sql.Types` code.
    pub const fn code(self) -> i32 {
        self.0
    }

    /// Returns the family whose native representation a default of this type is cast into,
    /// or `None` if there is no generic casting rule for it.
    pub const fn family(self) -> Option<TypeFamily> {
        Some(match self {
            Self::BIT | Self::BOOLEAN => TypeFamily::Boolean,

            Self::TINYINT | Self::SMALLINT | Self::INTEGER | Self::BIGINT => TypeFamily::Integer,

            Self::FLOAT | Self::REAL | Self::DOUBLE => TypeFamily::Float,

            Self::NUMERIC | Self::DECIMAL => TypeFamily::Decimal,

            Self::CHAR
            | Self::VARCHAR
            | Self::LONGVARCHAR
            | Self::NCHAR
            | Self::NVARCHAR
            | Self::LONGNVARCHAR
            | Self::CLOB
            | Self::NCLOB => TypeFamily::Text,

            Self::DATE => TypeFamily::Date,
            Self::TIME | Self::TIME_WITH_TIMEZONE => TypeFamily::Time,
            Self::TIMESTAMP | Self::TIMESTAMP_WITH_TIMEZONE => TypeFamily::Timestamp,

            Self::BINARY | Self::VARBINARY | Self::LONGVARBINARY | Self::BLOB => {
                TypeFamily::Binary
            }

            _ => return None,
        })
    }

    /// Returns the `java.sql.Types` constant name, or `""` for an unknown code.
    pub const fn name(self) -> &'static str {
        match self {
            Self::BIT => "BIT",
            Self::TINYINT => "TINYINT",
            Self::SMALLINT => "SMALLINT",
            Self::INTEGER => "INTEGER",
            Self::BIGINT => "BIGINT",
            Self::FLOAT => "FLOAT",
            Self::REAL => "REAL",
            Self::DOUBLE => "DOUBLE",
            Self::NUMERIC => "NUMERIC",
            Self::DECIMAL => "DECIMAL",
            Self::CHAR => "CHAR",
            Self::VARCHAR => "VARCHAR",
            Self::LONGVARCHAR => "LONGVARCHAR",
            Self::DATE => "DATE",
            Self::TIME => "TIME",
            Self::TIMESTAMP => "TIMESTAMP",
            Self::BINARY => "BINARY",
            Self::VARBINARY => "VARBINARY",
            Self::LONGVARBINARY => "LONGVARBINARY",
            Self::NULL => "NULL",
            Self::OTHER => "OTHER",
            Self::JAVA_OBJECT => "JAVA_OBJECT",
            Self::DISTINCT => "DISTINCT",
            Self::STRUCT => "STRUCT",
            Self::ARRAY => "ARRAY",
            Self::BLOB => "BLOB",
            Self::CLOB => "CLOB",
            Self::REF => "REF",
            Self::DATALINK => "DATALINK",
            Self::BOOLEAN => "BOOLEAN",
            Self::ROWID => "ROWID",
            Self::NCHAR => "NCHAR",
            Self::NVARCHAR => "NVARCHAR",
            Self::LONGNVARCHAR => "LONGNVARCHAR",
            Self::NCLOB => "NCLOB",
            Self::SQLXML => "SQLXML",
            Self::TIME_WITH_TIMEZONE => "TIME_WITH_TIMEZONE",
            Self::TIMESTAMP_WITH_TIMEZONE => "TIMESTAMP_WITH_TIMEZONE",
            _ => "",
        }
    }
}

impl From<i32> for SqlType {
    fn from(code: i32) -> Self {
        SqlType(code)
    }
}

impl Display for SqlType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.name() {
            "" => write!(f, "<type code {}>", self.0),
            name => f.write_str(name),
        }
    }
}
