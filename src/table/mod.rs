/*! Export of spin-priority tables

The runtime reads the final assignment as a static C array of
`{ name, resid, spin_prio, pid_hint }` records, one per assignment
entry, in the assignment's insertion order. */

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::model::{Priority, ResourceId, TaskSystem};
use crate::spin::SpinPriorities;

const GENERATOR: &str = "spin-table";

/// One record of the exported table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry<'a> {
    pub name: &'a str,
    pub resource: ResourceId,
    pub spin_priority: Priority,
    pub pid_hint: i64,
}

/// The table records of `priorities`, in insertion order.
pub fn entries<'a>(sys: &'a TaskSystem, priorities: &SpinPriorities) -> Vec<TableEntry<'a>> {
    priorities
        .entries()
        .iter()
        .map(|e| {
            let task = sys.task(e.task);
            TableEntry {
                name: &task.name,
                resource: e.resource,
                spin_priority: e.priority,
                pid_hint: task.pid_hint,
            }
        })
        .collect()
}

/// Render `entries` as a self-contained C header.
pub fn render_header(entries: &[TableEntry]) -> String {
    let mut out = String::new();
    out.push_str(&format!("/* Auto-generated by {} */\n", GENERATOR));
    out.push_str("#pragma once\n\n");
    out.push_str("#include <stdint.h>\n\n");
    out.push_str("struct spin_prio_entry {\n");
    out.push_str("    const char *name; /* task name / label */\n");
    out.push_str("    int resid;\n");
    out.push_str("    int spin_prio; /* numeric priority */\n");
    out.push_str("    int pid_hint; /* optional hint */\n");
    out.push_str("};\n\n");
    out.push_str("static const struct spin_prio_entry spin_prio_table[] = {\n");
    for e in entries {
        // writing into a String cannot fail
        let _ = writeln!(
            out,
            "    {{ {}, {}, {}, {} }},",
            c_string_literal(e.name),
            e.resource,
            e.spin_priority,
            e.pid_hint
        );
    }
    out.push_str("};\n\n");
    out.push_str(
        "static const int spin_prio_table_len = sizeof(spin_prio_table)/sizeof(spin_prio_table[0]);\n",
    );
    out
}

/// Write the rendered header to `out`.
pub fn write_header<W: Write>(out: &mut W, entries: &[TableEntry]) -> io::Result<()> {
    out.write_all(render_header(entries).as_bytes())
}

/// Write the rendered header to the file at `path`. The header is
/// rendered completely before the file is touched.
pub fn write_to_path(path: &Path, entries: &[TableEntry]) -> io::Result<()> {
    fs::write(path, render_header(entries))
}

/// Quote `s` as a C string literal.
fn c_string_literal(s: &str) -> String {
    let mut lit = String::with_capacity(s.len() + 2);
    lit.push('"');
    for b in s.bytes() {
        match b {
            b'"' => lit.push_str("\\\""),
            b'\\' => lit.push_str("\\\\"),
            b'\n' => lit.push_str("\\n"),
            b'\t' => lit.push_str("\\t"),
            0x20..=0x7e => lit.push(b as char),
            // three-digit octal escape
            _ => {
                let _ = write!(lit, "\\{:03o}", b);
            }
        }
    }
    lit.push('"');
    lit
}
