//! Record definition contract shared by every encrypted table.
//!
//! # Responsibility
//! - Describe a table (name, columns, DDL, indexes) from one closed column set.
//! - Hydrate a record from any `RowAccessor` regardless of column order.
//! - Run the field-level encryption lifecycle around storage writes/reads.
//!
//! # Invariants
//! - DDL and hydration are both derived from `RecordColumn::ALL`, so the
//!   create statement declares exactly the columns hydration recognizes.
//! - `encrypt` is all-or-nothing: on failure the record is left untouched.
//! - `decrypt` never fails; a field that cannot be decrypted keeps its
//!   prior value and the remaining fields are still processed.

use crate::model::cipher::{CipherResult, FieldCipher};
use crate::model::row::{RowAccessor, RowResult};
use log::{error, warn};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Storage type of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Text,
}

impl SqlType {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
        }
    }
}

/// Static description of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub primary_key: bool,
    pub not_null: bool,
}

impl ColumnDef {
    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, SqlType::Integer)
    }

    pub const fn text(name: &'static str) -> Self {
        Self::new(name, SqlType::Text)
    }

    const fn new(name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name,
            sql_type,
            primary_key: false,
            not_null: false,
        }
    }

    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    fn ddl_fragment(&self) -> String {
        let mut fragment = format!("{} {}", self.name, self.sql_type.as_sql());
        if self.primary_key {
            fragment.push_str(" PRIMARY KEY");
        }
        if self.not_null {
            fragment.push_str(" NOT NULL");
        }
        fragment
    }
}

/// Closed set of columns for one record type.
///
/// Implemented by a fieldless enum whose `def` is an exhaustive `match`, so
/// adding a variant without describing it does not compile.
pub trait RecordColumn: Copy + Eq + Debug + 'static {
    /// Every column in declaration order.
    const ALL: &'static [Self];

    fn def(self) -> ColumnDef;

    fn name(self) -> &'static str {
        self.def().name
    }

    /// Resolves a storage column name; unknown names yield `None`.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|column| column.name() == name)
    }
}

/// Table metadata built once per record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    table_name: &'static str,
    columns: Vec<ColumnDef>,
    create_statement: String,
    index_statements: &'static [&'static str],
}

impl RecordSchema {
    /// Builds the schema from a column enum.
    ///
    /// The create statement is conditional (`IF NOT EXISTS`) so it is safe
    /// to run against an existing table.
    pub fn new<C: RecordColumn>(
        table_name: &'static str,
        index_statements: &'static [&'static str],
    ) -> Self {
        let columns: Vec<ColumnDef> = C::ALL.iter().map(|column| column.def()).collect();
        let body = columns
            .iter()
            .map(ColumnDef::ddl_fragment)
            .collect::<Vec<_>>()
            .join(", ");
        let create_statement = format!("CREATE TABLE IF NOT EXISTS {table_name} ({body});");

        Self {
            table_name,
            columns,
            create_statement,
            index_statements,
        }
    }

    pub fn table_name(&self) -> &'static str {
        self.table_name
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|column| column.name)
    }

    pub fn create_statement(&self) -> &str {
        &self.create_statement
    }

    pub fn index_statements(&self) -> &'static [&'static str] {
        self.index_statements
    }
}

/// A required field was empty when the record was checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    MissingField(&'static str),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(column) => write!(f, "required field `{column}` is missing"),
        }
    }
}

impl Error for RecordValidationError {}

/// Outcome of a tolerant decrypt pass.
///
/// An empty report means every sensitive field decrypted. Columns listed
/// here still hold whatever value they had before the pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecryptReport {
    failed_columns: Vec<&'static str>,
}

impl DecryptReport {
    pub fn is_clean(&self) -> bool {
        self.failed_columns.is_empty()
    }

    pub fn failed_columns(&self) -> &[&'static str] {
        &self.failed_columns
    }
}

/// Self-describing, hydratable, field-encrypted record.
pub trait RecordDefinition: Default {
    type Column: RecordColumn;

    /// Schema shared by all instances of this record type.
    fn schema() -> &'static RecordSchema;

    /// Stores one row value into the field owned by `column`.
    fn assign<A: RowAccessor + ?Sized>(
        &mut self,
        column: Self::Column,
        row: &A,
        index: usize,
    ) -> RowResult<()>;

    /// Sensitive string fields in a fixed order, each paired with its column.
    fn sensitive_fields_mut(&mut self) -> Vec<(Self::Column, &mut Option<String>)>;

    fn table_name(&self) -> &'static str {
        Self::schema().table_name()
    }

    fn create_statement(&self) -> &'static str {
        Self::schema().create_statement()
    }

    fn index_statements(&self) -> &'static [&'static str] {
        Self::schema().index_statements()
    }

    /// Populates fields from `row` by column name.
    ///
    /// Unknown column names are skipped. A row with no columns leaves the
    /// record at its defaults.
    fn fill_from_row<A: RowAccessor + ?Sized>(&mut self, row: &A) -> RowResult<()> {
        for index in 0..row.column_count() {
            let name = row.column_name(index)?;
            if let Some(column) = Self::Column::from_name(name) {
                self.assign(column, row, index)?;
            }
        }
        Ok(())
    }

    /// Creates a default record and hydrates it from `row`.
    fn from_row<A: RowAccessor + ?Sized>(row: &A) -> RowResult<Self> {
        let mut record = Self::default();
        record.fill_from_row(row)?;
        Ok(record)
    }

    /// Encrypts every sensitive field independently.
    ///
    /// # Errors
    /// Returns the first cipher error. No field is modified in that case,
    /// so a failed record can never be written half-encrypted.
    fn encrypt<C: FieldCipher + ?Sized>(&mut self, cipher: &C) -> CipherResult<()> {
        let table = Self::schema().table_name();
        let mut fields = self.sensitive_fields_mut();

        let mut sealed = Vec::with_capacity(fields.len());
        for (column, value) in &fields {
            match cipher.encrypt(value.as_deref()) {
                Ok(ciphertext) => sealed.push(ciphertext),
                Err(err) => {
                    error!(
                        "event=record_encrypt module=record status=error table={} column={} error_kind={}",
                        table,
                        column.name(),
                        err.kind().as_str()
                    );
                    return Err(err);
                }
            }
        }

        for ((_, value), ciphertext) in fields.iter_mut().zip(sealed) {
            **value = ciphertext;
        }
        Ok(())
    }

    /// Decrypts every sensitive field, continuing past failures.
    fn decrypt<C: FieldCipher + ?Sized>(&mut self, cipher: &C) -> DecryptReport {
        let table = Self::schema().table_name();
        let mut report = DecryptReport::default();

        for (column, value) in self.sensitive_fields_mut() {
            match cipher.decrypt(value.as_deref()) {
                Ok(plaintext) => *value = plaintext,
                Err(err) => {
                    warn!(
                        "event=record_decrypt module=record status=partial table={} column={} error_kind={}",
                        table,
                        column.name(),
                        err.kind().as_str()
                    );
                    report.failed_columns.push(column.name());
                }
            }
        }

        report
    }
}
