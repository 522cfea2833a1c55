//! Assembly of the INISTRS initial-stress block.
//!
//! ```text
//! INISTRS 100             0
//!         ELEM           1
//!         VALUE      100.5   1e-05123456.7     0.0    42.0-3.14159
//! ```
//!
//! The header is followed by an ELEM/VALUE line pair per element. Lines are
//! separated by `\n` and the block has no trailing newline.

use tracing::{debug, warn};

use crate::component::Component;
use crate::error::Result;
use crate::field::{Field, OverflowPolicy};
use crate::join::JoinedRecord;

pub const KEYWORD: &str = "INISTRS";
pub const DEFAULT_SUBCASE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockOptions {
    pub subcase: u32,
    pub overflow: OverflowPolicy,
}

impl Default for BlockOptions {
    fn default() -> Self {
        Self {
            subcase: DEFAULT_SUBCASE,
            overflow: OverflowPolicy::Truncate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBlock {
    lines: Vec<String>,
    overflowed_fields: usize,
}

impl OutputBlock {
    pub fn build(records: &[JoinedRecord], options: &BlockOptions) -> Result<Self> {
        let mut builder = LineBuilder {
            policy: options.overflow,
            overflowed: 0,
        };
        let mut lines = Vec::with_capacity(1 + 2 * records.len());

        let subcase = options.subcase.to_string();
        lines.push(builder.line(&[
            Field::Text(KEYWORD),
            Field::Text(&subcase),
            Field::Text(""),
            Field::Text("0"),
        ])?);

        for record in records {
            lines.push(builder.line(&[
                Field::Text(""),
                Field::Text("ELEM"),
                Field::Integer(record.element_id),
            ])?);

            let mut value_fields = [Field::Text(""); 8];
            value_fields[1] = Field::Text("VALUE");
            for component in Component::ALL {
                value_fields[2 + component.index()] = Field::Decimal(record.value(component));
            }
            let before = builder.overflowed;
            lines.push(builder.line(&value_fields)?);
            if builder.overflowed > before {
                debug!(
                    element_id = record.element_id,
                    fields = builder.overflowed - before,
                    "stress values truncated to 8 columns"
                );
            }
        }
        if builder.overflowed > 0 {
            warn!(
                fields = builder.overflowed,
                policy = ?options.overflow,
                "fields did not fit in 8 columns"
            );
        }

        Ok(Self {
            lines,
            overflowed_fields: builder.overflowed,
        })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of fields written wider than, or cut to, their column.
    pub fn overflowed_fields(&self) -> usize {
        self.overflowed_fields
    }

    /// The block as written to disk.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

struct LineBuilder {
    policy: OverflowPolicy,
    overflowed: usize,
}

impl LineBuilder {
    fn line(&mut self, fields: &[Field<'_>]) -> Result<String> {
        let mut line = String::with_capacity(fields.len() * crate::field::FIELD_WIDTH);
        for field in fields {
            if field.write_to(&mut line, self.policy)? {
                self.overflowed += 1;
                if let Field::Integer(id) = field {
                    warn!(element_id = id, "element id wider than 8 columns");
                }
            }
        }
        Ok(line)
    }
}
