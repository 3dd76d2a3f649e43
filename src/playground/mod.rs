//! Best-effort translation of Drizzle ORM query-builder chains into SQL.
//!
//! This is lexical pattern matching for the query playground, not a parser:
//! there is no grammar and no guarantee the output is valid SQL for every
//! input the builder accepts. Anything unrecognized is reported as an error
//! instead of being guessed at.

mod lexer;

use std::sync::LazyLock;

use custom_error::custom_error;
use log::debug;
use regex::Regex;

use self::lexer::{parse_chain, split_top_level, unwrap_group, Call};

custom_error! {pub TransformError
    Empty = "Nothing to transform",
    UnsupportedStatement{input: String} = "Unsupported query: {input}",
    UnsupportedMethod{method: String} = "Unsupported builder method: .{method}()",
    Unbalanced{input: String} = "Unbalanced brackets in: {input}",
    MissingTable{statement: String} = "No table given for {statement}",
    UnsupportedCondition{condition: String} = "Unsupported condition: {condition}",
    UnsupportedValue{value: String} = "Unsupported value: {value}",
}

static IDENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_$][\w$]*$").expect("valid regex"));
static COLUMN_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][\w$]*\.([A-Za-z_$][\w$]*)$").expect("valid regex"));
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("valid regex"));
static INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));
static FUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_$][\w$]*)\s*\(").expect("valid regex"));
static SQL_TEMPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^sql\s*`([^`$]*)`$").expect("valid regex"));

/// Builder methods that only affect execution, not the statement.
const EXECUTION_METHODS: &[&str] = &["execute", "all", "get", "run", "prepare"];

/// Translates one Drizzle query-builder expression into a SQL statement.
pub fn drizzle_to_sql(input: &str) -> Result<String, TransformError> {
    let calls = parse_chain(input)?;
    let (first, rest) = calls.split_first().ok_or(TransformError::Empty)?;
    debug!("Transforming .{}() chain with {} calls", first.name, calls.len());

    let sql = match first.name {
        "select" => select(first, rest, false)?,
        "selectDistinct" => select(first, rest, true)?,
        "insert" => insert(first, rest)?,
        "update" => update(first, rest)?,
        "delete" => delete(first, rest)?,
        other => {
            return Err(TransformError::UnsupportedMethod {
                method: other.to_string(),
            })
        }
    };
    Ok(format!("{sql};"))
}

fn table_name(call: &Call, statement: &str) -> Result<String, TransformError> {
    let table = call.args.trim();
    if IDENT.is_match(table) {
        Ok(table.to_string())
    } else {
        Err(TransformError::MissingTable {
            statement: statement.to_string(),
        })
    }
}

fn select(first: &Call, rest: &[Call], distinct: bool) -> Result<String, TransformError> {
    let columns = if first.args.is_empty() {
        "*".to_string()
    } else {
        let fields = unwrap_group(first.args, '{', '}').ok_or_else(|| {
            TransformError::UnsupportedValue {
                value: first.args.to_string(),
            }
        })?;
        object_entries(fields)?
            .into_iter()
            .map(|(alias, value)| -> Result<String, TransformError> {
                let expression = operand(value)?;
                Ok(if expression == alias {
                    expression
                } else {
                    format!("{expression} AS {alias}")
                })
            })
            .collect::<Result<Vec<_>, _>>()?
            .join(", ")
    };

    let mut sql = format!(
        "SELECT {}{columns}",
        if distinct { "DISTINCT " } else { "" }
    );
    let mut has_from = false;
    for call in rest {
        match call.name {
            "from" => {
                sql.push_str(&format!(" FROM {}", table_name(call, "SELECT")?));
                has_from = true;
            }
            "leftJoin" | "innerJoin" | "rightJoin" | "fullJoin" => {
                let kind = match call.name {
                    "leftJoin" => "LEFT",
                    "innerJoin" => "INNER",
                    "rightJoin" => "RIGHT",
                    _ => "FULL",
                };
                let args = split_top_level(call.args, ',');
                let [table, on] = args.as_slice() else {
                    return Err(TransformError::UnsupportedCondition {
                        condition: call.args.to_string(),
                    });
                };
                if !IDENT.is_match(table) {
                    return Err(TransformError::MissingTable {
                        statement: format!("{kind} JOIN"),
                    });
                }
                sql.push_str(&format!(" {kind} JOIN {table} ON {}", condition(on)?));
            }
            "orderBy" => sql.push_str(&format!(" ORDER BY {}", order_by(call.args)?)),
            "groupBy" => {
                let columns = split_top_level(call.args, ',')
                    .into_iter()
                    .map(operand)
                    .collect::<Result<Vec<_>, _>>()?;
                sql.push_str(&format!(" GROUP BY {}", columns.join(", ")));
            }
            _ => apply_common(&mut sql, call)?,
        }
    }

    if !has_from {
        return Err(TransformError::MissingTable {
            statement: "SELECT".to_string(),
        });
    }
    Ok(sql)
}

fn insert(first: &Call, rest: &[Call]) -> Result<String, TransformError> {
    let table = table_name(first, "INSERT")?;
    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<String> = Vec::new();
    let mut tail = String::new();

    for call in rest {
        match call.name {
            "values" => {
                let objects = match unwrap_group(call.args, '[', ']') {
                    Some(list) => split_top_level(list, ','),
                    None => vec![call.args],
                };
                for object in objects {
                    let fields = unwrap_group(object, '{', '}').ok_or_else(|| {
                        TransformError::UnsupportedValue {
                            value: object.to_string(),
                        }
                    })?;
                    let entries = object_entries(fields)?;
                    if columns.is_empty() {
                        columns = entries.iter().map(|(key, _)| key.clone()).collect();
                    }
                    let values = entries
                        .iter()
                        .map(|(_, value)| literal(value))
                        .collect::<Result<Vec<_>, _>>()?;
                    rows.push(format!("({})", values.join(", ")));
                }
            }
            "onConflictDoNothing" => tail.push_str(" ON CONFLICT DO NOTHING"),
            _ => apply_common(&mut tail, call)?,
        }
    }

    if rows.is_empty() {
        return Err(TransformError::UnsupportedStatement {
            input: format!("insert into {table} without .values()"),
        });
    }
    Ok(format!(
        "INSERT INTO {table} ({}) VALUES {}{tail}",
        columns.join(", "),
        rows.join(", ")
    ))
}

fn update(first: &Call, rest: &[Call]) -> Result<String, TransformError> {
    let table = table_name(first, "UPDATE")?;
    let mut assignments = Vec::new();
    let mut tail = String::new();

    for call in rest {
        if call.name == "set" {
            let fields = unwrap_group(call.args, '{', '}').ok_or_else(|| {
                TransformError::UnsupportedValue {
                    value: call.args.to_string(),
                }
            })?;
            for (column, value) in object_entries(fields)? {
                assignments.push(format!("{column} = {}", literal(value)?));
            }
        } else {
            apply_common(&mut tail, call)?;
        }
    }

    if assignments.is_empty() {
        return Err(TransformError::UnsupportedStatement {
            input: format!("update {table} without .set()"),
        });
    }
    Ok(format!("UPDATE {table} SET {}{tail}", assignments.join(", ")))
}

fn delete(first: &Call, rest: &[Call]) -> Result<String, TransformError> {
    let mut sql = format!("DELETE FROM {}", table_name(first, "DELETE")?);
    for call in rest {
        apply_common(&mut sql, call)?;
    }
    Ok(sql)
}

/// Clauses shared by every statement kind.
fn apply_common(sql: &mut String, call: &Call) -> Result<(), TransformError> {
    match call.name {
        "where" => sql.push_str(&format!(" WHERE {}", condition(call.args)?)),
        "limit" | "offset" => {
            if !INTEGER.is_match(call.args) {
                return Err(TransformError::UnsupportedValue {
                    value: call.args.to_string(),
                });
            }
            sql.push_str(&format!(" {} {}", call.name.to_uppercase(), call.args));
        }
        "returning" => {
            let columns = if call.args.is_empty() {
                "*".to_string()
            } else {
                let fields = unwrap_group(call.args, '{', '}').unwrap_or(call.args);
                object_entries(fields)?
                    .into_iter()
                    .map(|(_, value)| operand(value))
                    .collect::<Result<Vec<_>, _>>()?
                    .join(", ")
            };
            sql.push_str(&format!(" RETURNING {columns}"));
        }
        name if EXECUTION_METHODS.contains(&name) => {}
        other => {
            return Err(TransformError::UnsupportedMethod {
                method: other.to_string(),
            })
        }
    }
    Ok(())
}

fn order_by(args: &str) -> Result<String, TransformError> {
    let terms = split_top_level(args, ',')
        .into_iter()
        .map(|term| -> Result<String, TransformError> {
            match function_call(term) {
                Some(("desc", inner)) => Ok(format!("{} DESC", operand(inner)?)),
                Some(("asc", inner)) => Ok(format!("{} ASC", operand(inner)?)),
                _ => operand(term),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(terms.join(", "))
}

/// Splits `name(args)` when the whole term is a single call.
fn function_call(term: &str) -> Option<(&str, &str)> {
    let term = term.trim();
    let head = FUNCTION.captures(term)?;
    let name = head.get(1)?.as_str();
    let open = head.get(0)?.end() - 1;
    let inner = unwrap_group(&term[open..], '(', ')')?;
    Some((name, inner))
}

fn condition(text: &str) -> Result<String, TransformError> {
    let unsupported = || TransformError::UnsupportedCondition {
        condition: text.trim().to_string(),
    };
    let (name, inner) = function_call(text).ok_or_else(unsupported)?;
    let args = split_top_level(inner, ',');

    let binary = |op: &str| -> Result<String, TransformError> {
        match args.as_slice() {
            [left, right] => Ok(format!("{} {op} {}", operand(left)?, literal(right)?)),
            _ => Err(unsupported()),
        }
    };

    match name {
        "eq" => binary("="),
        "ne" => binary("<>"),
        "gt" => binary(">"),
        "gte" => binary(">="),
        "lt" => binary("<"),
        "lte" => binary("<="),
        "like" => binary("LIKE"),
        "notLike" => binary("NOT LIKE"),
        "ilike" => binary("ILIKE"),
        "isNull" | "isNotNull" => match args.as_slice() {
            [column] => Ok(format!(
                "{} IS {}NULL",
                operand(column)?,
                if name == "isNotNull" { "NOT " } else { "" }
            )),
            _ => Err(unsupported()),
        },
        "inArray" | "notInArray" => match args.as_slice() {
            [column, list] => {
                let items = unwrap_group(list, '[', ']').ok_or_else(unsupported)?;
                let values = split_top_level(items, ',')
                    .into_iter()
                    .map(literal)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!(
                    "{} {}IN ({})",
                    operand(column)?,
                    if name == "notInArray" { "NOT " } else { "" },
                    values.join(", ")
                ))
            }
            _ => Err(unsupported()),
        },
        "between" => match args.as_slice() {
            [column, low, high] => Ok(format!(
                "{} BETWEEN {} AND {}",
                operand(column)?,
                literal(low)?,
                literal(high)?
            )),
            _ => Err(unsupported()),
        },
        "and" | "or" => {
            if args.is_empty() {
                return Err(unsupported());
            }
            let parts = args
                .iter()
                .map(|arg| condition(arg))
                .collect::<Result<Vec<_>, _>>()?;
            let joined = parts.join(if name == "and" { " AND " } else { " OR " });
            Ok(if parts.len() > 1 {
                format!("({joined})")
            } else {
                joined
            })
        }
        "not" => match args.as_slice() {
            [inner] => Ok(format!("NOT ({})", condition(inner)?)),
            _ => Err(unsupported()),
        },
        _ => Err(unsupported()),
    }
}

/// Column reference, raw `sql` template or literal.
fn operand(text: &str) -> Result<String, TransformError> {
    let text = text.trim();
    if let Some(column) = COLUMN_REF.captures(text).and_then(|c| c.get(1)) {
        return Ok(column.as_str().to_string());
    }
    if let Some(raw) = SQL_TEMPLATE.captures(text).and_then(|c| c.get(1)) {
        return Ok(raw.as_str().trim().to_string());
    }
    literal(text)
}

/// SQL literal for a JS value. Bare identifiers become named parameters.
fn literal(text: &str) -> Result<String, TransformError> {
    let text = text.trim();
    let unsupported = || TransformError::UnsupportedValue {
        value: text.to_string(),
    };

    if let Some(column) = COLUMN_REF.captures(text).and_then(|c| c.get(1)) {
        return Ok(column.as_str().to_string());
    }
    match text {
        "true" => return Ok("TRUE".to_string()),
        "false" => return Ok("FALSE".to_string()),
        "null" | "undefined" => return Ok("NULL".to_string()),
        _ => {}
    }
    if NUMBER.is_match(text) {
        return Ok(text.to_string());
    }
    if IDENT.is_match(text) {
        return Ok(format!(":{text}"));
    }
    if let Some(raw) = SQL_TEMPLATE.captures(text).and_then(|c| c.get(1)) {
        return Ok(raw.as_str().trim().to_string());
    }

    let mut chars = text.chars();
    let quote = chars.next().ok_or_else(unsupported)?;
    if !matches!(quote, '\'' | '"' | '`') || text.len() < 2 || !text.ends_with(quote) {
        return Err(unsupported());
    }
    let body = &text[1..text.len() - 1];
    if quote == '`' && body.contains("${") {
        return Err(unsupported());
    }

    let mut unescaped = String::with_capacity(body.len());
    let mut escaped = false;
    for ch in body.chars() {
        if escaped {
            unescaped.push(match ch {
                'n' => '\n',
                't' => '\t',
                other => other,
            });
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else {
            unescaped.push(ch);
        }
    }
    Ok(format!("'{}'", unescaped.replace('\'', "''")))
}

/// `key: value` pairs of an object literal body. Shorthand `{ name }`
/// yields a named parameter.
fn object_entries(fields: &str) -> Result<Vec<(String, &str)>, TransformError> {
    split_top_level(fields, ',')
        .into_iter()
        .map(|entry| {
            let parts = split_top_level(entry, ':');
            match parts.as_slice() {
                [key] if IDENT.is_match(key) => Ok((key.to_string(), *key)),
                [key, value] => {
                    let key = key.trim_matches(|c| c == '"' || c == '\'');
                    Ok((key.to_string(), *value))
                }
                _ => Err(TransformError::UnsupportedValue {
                    value: entry.to_string(),
                }),
            }
        })
        .collect()
}
