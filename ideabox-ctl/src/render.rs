use std::fmt::Write;

use ideabox_client::{api::Comment, Thread, TIME_FORMAT};

const INDENT: &str = "    ";

fn header(c: &Comment, deletable: bool) -> String {
    format!(
        "{} · {} [#{}]{}",
        c.username,
        c.created_at.format(TIME_FORMAT),
        c.id,
        if deletable { " (yours)" } else { "" },
    )
}

/// Plain-text rendering of a thread, one indentation step per level
pub fn render(thread: &Thread, me: Option<&str>) -> String {
    let mut out = String::new();
    if thread.is_empty() {
        out.push_str("No Comments Present\n");
    }
    for node in thread.iter() {
        let pad = INDENT.repeat(node.level);
        let c = &node.comment;
        let _ = writeln!(out, "{pad}{}", header(c, me == Some(&c.username as &str)));
        for line in c.comment.lines() {
            let _ = writeln!(out, "{pad}  {line}");
        }
    }
    let hidden = thread.num_hidden();
    if hidden > 0 {
        let _ = writeln!(
            out,
            "({hidden} comment(s) whose parent is not in this thread)"
        );
    }
    out
}
