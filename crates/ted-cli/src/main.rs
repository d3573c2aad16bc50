use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;
use std::process;
use ted_core::{
    DocFormat, Editor, RawFormat, ValueType, backup_file, coerce_value, load_or_empty, parse_raw,
    render_document, save_document,
};

#[derive(Parser, Debug)]
#[command(
    name = "ted",
    about = "Create, modify, and idempotently manage YAML/JSON documents via dotted paths",
    version
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the value at a path (the whole document for an empty path)
    Get(GetArgs),
    /// Set the value at a path, creating intermediate mappings as needed
    Put(PutArgs),
    /// Merge into a mapping entry, or replace/insert within a sequence entry
    Update(UpdateArgs),
    /// Append a value to an existing sequence entry
    Append(PutArgs),
    /// Remove the entry at a path
    Delete(DeleteArgs),
    /// Remove a key or a matching item from the entry at a path
    Pop(PutArgs),
    /// Check whether a value exists at a path
    Exists(ExistsArgs),
}

#[derive(ClapArgs, Debug)]
struct DocArgs {
    /// Document to operate on (.yml, .yaml, or .json)
    file: PathBuf,
    /// Path to the target value, e.g. a.b[0].c
    #[arg(long, default_value = "")]
    key: String,
    /// Separator joining key segments
    #[arg(long, default_value_t = '.')]
    sep: char,
}

#[derive(ClapArgs, Debug)]
struct ValueArgs {
    /// Raw value text
    #[arg(long)]
    value: String,
    /// How to interpret --value
    #[arg(long, value_enum, default_value_t = ValueTypeArg::Auto)]
    value_type: ValueTypeArg,
}

#[derive(ClapArgs, Debug)]
struct WriteArgs {
    /// Write the result back to the document instead of stdout
    #[arg(long)]
    in_place: bool,
    /// Copy the document to a timestamped .orig file before writing
    #[arg(long, requires = "in_place")]
    backup: bool,
    /// Write the result to this file instead of stdout
    #[arg(long, conflicts_with = "in_place")]
    out: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct GetArgs {
    #[command(flatten)]
    doc: DocArgs,
}

#[derive(ClapArgs, Debug)]
struct PutArgs {
    #[command(flatten)]
    doc: DocArgs,
    #[command(flatten)]
    value: ValueArgs,
    #[command(flatten)]
    write: WriteArgs,
}

#[derive(ClapArgs, Debug)]
struct UpdateArgs {
    #[command(flatten)]
    doc: DocArgs,
    #[command(flatten)]
    value: ValueArgs,
    /// Sequence index to replace
    #[arg(long, conflicts_with = "curr_value")]
    index: Option<usize>,
    /// Current value to locate in a sequence entry
    #[arg(long)]
    curr_value: Option<String>,
    /// Format of --curr-value
    #[arg(long, value_enum, default_value_t = RawFormatArg::Yaml)]
    curr_value_format: RawFormatArg,
    #[command(flatten)]
    write: WriteArgs,
}

#[derive(ClapArgs, Debug)]
struct DeleteArgs {
    #[command(flatten)]
    doc: DocArgs,
    #[command(flatten)]
    write: WriteArgs,
}

#[derive(ClapArgs, Debug)]
struct ExistsArgs {
    #[command(flatten)]
    doc: DocArgs,
    #[command(flatten)]
    value: ValueArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ValueTypeArg {
    Auto,
    Str,
    Bool,
    Structured,
}

impl From<ValueTypeArg> for ValueType {
    fn from(v: ValueTypeArg) -> Self {
        match v {
            ValueTypeArg::Auto => ValueType::Auto,
            ValueTypeArg::Str => ValueType::Str,
            ValueTypeArg::Bool => ValueType::Bool,
            ValueTypeArg::Structured => ValueType::Structured,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RawFormatArg {
    Yaml,
    Json,
    Str,
}

impl From<RawFormatArg> for RawFormat {
    fn from(v: RawFormatArg) -> Self {
        match v {
            RawFormatArg::Yaml => RawFormat::Yaml,
            RawFormatArg::Json => RawFormat::Json,
            RawFormatArg::Str => RawFormat::Str,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Get(a) => cmd_get(a),
        Cmd::Put(a) => cmd_put(a),
        Cmd::Update(a) => cmd_update(a),
        Cmd::Append(a) => cmd_append(a),
        Cmd::Delete(a) => cmd_delete(a),
        Cmd::Pop(a) => cmd_pop(a),
        Cmd::Exists(a) => cmd_exists(a),
    }
}

fn open_editor(doc: &DocArgs) -> (Editor, DocFormat, bool) {
    let (root, format, existed) = load_or_empty(&doc.file).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(2);
    });
    (Editor::with_separator(root, doc.sep), format, existed)
}

fn coerce_cli_value(args: &ValueArgs) -> Value {
    coerce_value(Value::String(args.value.clone()), args.value_type.into()).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(3);
    })
}

fn finish(
    doc: &DocArgs,
    write: &WriteArgs,
    editor: &Editor,
    format: DocFormat,
    changed: bool,
    existed: bool,
) {
    if let Some(out) = &write.out {
        save_document(out, editor.root(), format).unwrap_or_else(|e| {
            eprintln!("error writing: {e}");
            process::exit(5);
        });
        println!("changed: {changed}");
    } else if write.in_place {
        if changed {
            if write.backup && existed {
                backup_file(&doc.file).unwrap_or_else(|e| {
                    eprintln!("error backing up: {e}");
                    process::exit(5);
                });
            }
            save_document(&doc.file, editor.root(), format).unwrap_or_else(|e| {
                eprintln!("error writing: {e}");
                process::exit(5);
            });
        }
        println!("changed: {changed}");
    } else {
        let text = render_document(editor.root(), format).unwrap_or_else(|e| {
            eprintln!("error: {e}");
            process::exit(5);
        });
        print!("{text}");
    }
}

fn cmd_get(args: GetArgs) {
    let (editor, format, _) = open_editor(&args.doc);
    let found = editor.get(&args.doc.key).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(4);
    });
    match found {
        Some(v) => {
            let text = render_document(v, format).unwrap_or_else(|e| {
                eprintln!("error: {e}");
                process::exit(5);
            });
            print!("{text}");
        }
        None => {
            eprintln!("not found: {}", args.doc.key);
            process::exit(3);
        }
    }
}

fn cmd_put(args: PutArgs) {
    let (mut editor, format, existed) = open_editor(&args.doc);
    let value = coerce_cli_value(&args.value);
    let changed = if existed {
        editor.put(&args.doc.key, value)
    } else {
        editor.create(&args.doc.key, value)
    }
    .unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(4);
    });
    finish(&args.doc, &args.write, &editor, format, changed, existed);
}

fn cmd_update(args: UpdateArgs) {
    let (mut editor, format, existed) = open_editor(&args.doc);
    let value = coerce_cli_value(&args.value);
    let curr = args.curr_value.as_deref().map(|raw| {
        parse_raw(raw, args.curr_value_format.into()).unwrap_or_else(|e| {
            eprintln!("error: {e}");
            process::exit(3);
        })
    });
    let changed = editor
        .update(&args.doc.key, value, args.index, curr.as_ref())
        .unwrap_or_else(|e| {
            eprintln!("error: {e}");
            process::exit(4);
        });
    finish(&args.doc, &args.write, &editor, format, changed, existed);
}

fn cmd_append(args: PutArgs) {
    let (mut editor, format, existed) = open_editor(&args.doc);
    let value = coerce_cli_value(&args.value);
    let changed = editor.append(&args.doc.key, value).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(4);
    });
    finish(&args.doc, &args.write, &editor, format, changed, existed);
}

fn cmd_delete(args: DeleteArgs) {
    let (mut editor, format, existed) = open_editor(&args.doc);
    let changed = editor.delete(&args.doc.key).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(4);
    });
    finish(&args.doc, &args.write, &editor, format, changed, existed);
}

fn cmd_pop(args: PutArgs) {
    let (mut editor, format, existed) = open_editor(&args.doc);
    let value = coerce_cli_value(&args.value);
    let changed = editor.pop(&args.doc.key, &value).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(4);
    });
    finish(&args.doc, &args.write, &editor, format, changed, existed);
}

fn cmd_exists(args: ExistsArgs) {
    let (editor, _, _) = open_editor(&args.doc);
    let value = coerce_cli_value(&args.value);
    let found = editor.exists(&args.doc.key, &value).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(4);
    });
    println!("{found}");
    if !found {
        process::exit(1);
    }
}
