use std::collections::HashMap;

use crate::api::{Comment, CommentId};

/// Indentation level past which replies stop being shifted further right
pub const DEFAULT_MAX_INDENT: usize = 4;

/// What to do with comments whose parent is not part of the fetched thread,
/// eg. because the parent got deleted
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OrphanPolicy {
    /// Do not render them at all
    #[default]
    Hide,

    /// Render them (with their own replies) after the real root comments
    PromoteToRoot,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ThreadConfig {
    pub max_indent: usize,
    pub orphans: OrphanPolicy,
}

impl Default for ThreadConfig {
    fn default() -> ThreadConfig {
        ThreadConfig {
            max_indent: DEFAULT_MAX_INDENT,
            orphans: OrphanPolicy::Hide,
        }
    }
}

impl ThreadConfig {
    /// Indentation level of the replies to a comment shown at `level`
    pub fn child_level(&self, level: usize) -> usize {
        match level < self.max_indent {
            true => level + 1,
            false => level,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ThreadNode {
    pub comment: Comment,

    /// Indentation level, saturating at `ThreadConfig::max_indent`
    pub level: usize,

    /// Number of ancestors actually rendered above this comment
    pub depth: usize,

    /// Replies, in the order the backend returned them
    pub replies: Vec<ThreadNode>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Thread {
    roots: Vec<ThreadNode>,
    orphans: Vec<Comment>,
    policy: OrphanPolicy,
}

struct Builder<'a> {
    comments: &'a [Comment],
    children: HashMap<&'a CommentId, Vec<usize>>,
    placed: Vec<bool>,
    config: &'a ThreadConfig,
}

impl<'a> Builder<'a> {
    fn node(&mut self, idx: usize, level: usize, depth: usize) -> Option<ThreadNode> {
        // A comment is rendered at most once, even with duplicate ids or a
        // parent cycle coming from the backend
        if std::mem::replace(&mut self.placed[idx], true) {
            return None;
        }
        let comments = self.comments;
        let comment = &comments[idx];
        let child_level = self.config.child_level(level);
        let replies = self
            .children
            .get(&comment.id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| self.node(c, child_level, depth + 1))
            .collect();
        Some(ThreadNode {
            comment: comment.clone(),
            level,
            depth,
            replies,
        })
    }
}

impl Thread {
    /// Nest a flat comment list by `parent_id`.
    ///
    /// Children are grouped by parent in a single pass and the tree is then
    /// built by recursing over that index. This yields the same nesting as
    /// filtering the whole list again at every level, in O(n) instead of
    /// O(n²).
    pub fn build(comments: &[Comment], config: &ThreadConfig) -> Thread {
        let mut roots = Vec::new();
        let mut children = HashMap::<&CommentId, Vec<usize>>::new();
        for (i, c) in comments.iter().enumerate() {
            match &c.parent_id {
                None => roots.push(i),
                Some(parent) => children.entry(parent).or_default().push(i),
            }
        }

        let mut builder = Builder {
            comments,
            children,
            placed: vec![false; comments.len()],
            config,
        };
        let mut res = roots
            .into_iter()
            .filter_map(|i| builder.node(i, 0, 0))
            .collect::<Vec<_>>();

        let orphans = (0..comments.len())
            .filter(|i| !builder.placed[*i])
            .collect::<Vec<_>>();
        if !orphans.is_empty() {
            tracing::warn!(
                num_orphans = orphans.len(),
                policy = ?config.orphans,
                "comments without a reachable parent in this thread"
            );
        }

        if config.orphans == OrphanPolicy::PromoteToRoot {
            let ids = comments.iter().map(|c| &c.id).collect::<Vec<_>>();
            let dangling = |i: &usize| match &comments[*i].parent_id {
                Some(p) => !ids.contains(&p),
                None => false,
            };
            // Comments whose parent is missing go first so that their own
            // replies stay nested under them, then whatever is left (cycles)
            let (first, rest): (Vec<usize>, Vec<usize>) =
                orphans.iter().copied().partition(dangling);
            for i in first.into_iter().chain(rest) {
                res.extend(builder.node(i, 0, 0));
            }
        }

        Thread {
            roots: res,
            orphans: orphans.into_iter().map(|i| comments[i].clone()).collect(),
            policy: config.orphans,
        }
    }

    pub fn roots(&self) -> &[ThreadNode] {
        &self.roots
    }

    /// Comments that do not descend from any root comment, whatever the policy
    pub fn orphans(&self) -> &[Comment] {
        &self.orphans
    }

    /// Number of orphans left out of the rendered tree
    pub fn num_hidden(&self) -> usize {
        match self.policy {
            OrphanPolicy::Hide => self.orphans.len(),
            OrphanPolicy::PromoteToRoot => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Depth-first walk over the rendered comments, in display order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: self.roots.iter().rev().collect(),
        }
    }
}

pub struct Iter<'a> {
    stack: Vec<&'a ThreadNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a ThreadNode;

    fn next(&mut self) -> Option<&'a ThreadNode> {
        let node = self.stack.pop()?;
        self.stack.extend(node.replies.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::TimeZone;

    use super::*;

    fn comment(id: &str, parent: Option<&str>) -> Comment {
        Comment {
            id: CommentId::from(id),
            comment: format!("comment {id}"),
            parent_id: parent.map(CommentId::from),
            username: String::from("ann"),
            created_at: chrono::Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
        }
    }

    fn shape(thread: &Thread) -> Vec<(String, usize)> {
        thread
            .iter()
            .map(|n| (n.comment.id.0.clone(), n.level))
            .collect()
    }

    #[test]
    fn nests_a_chain() {
        let thread = Thread::build(
            &[
                comment("1", None),
                comment("2", Some("1")),
                comment("3", Some("2")),
            ],
            &ThreadConfig::default(),
        );
        assert_eq!(thread.roots().len(), 1);
        let one = &thread.roots()[0];
        assert_eq!((one.comment.id.0.as_str(), one.level), ("1", 0));
        let two = &one.replies[0];
        assert_eq!((two.comment.id.0.as_str(), two.level), ("2", 1));
        let three = &two.replies[0];
        assert_eq!((three.comment.id.0.as_str(), three.level), ("3", 2));
        assert!(three.replies.is_empty());
        assert!(thread.orphans().is_empty());
    }

    #[test]
    fn indentation_saturates() {
        let mut comments = vec![comment("0", None)];
        for i in 1..8 {
            comments.push(comment(&i.to_string(), Some(&(i - 1).to_string())));
        }
        let thread = Thread::build(&comments, &ThreadConfig::default());
        let levels = thread.iter().map(|n| n.level).collect::<Vec<_>>();
        assert_eq!(levels, vec![0, 1, 2, 3, 4, 4, 4, 4]);
        let depths = thread.iter().map(|n| n.depth).collect::<Vec<_>>();
        assert_eq!(depths, (0..8).collect::<Vec<_>>());

        let flat = ThreadConfig {
            max_indent: 1,
            ..ThreadConfig::default()
        };
        let levels = Thread::build(&comments, &flat)
            .iter()
            .map(|n| n.level)
            .collect::<Vec<_>>();
        assert_eq!(levels, vec![0, 1, 1, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn siblings_keep_backend_order() {
        let thread = Thread::build(
            &[
                comment("b", None),
                comment("b2", Some("b")),
                comment("a", None),
                comment("b1", Some("b")),
                comment("a1", Some("a")),
            ],
            &ThreadConfig::default(),
        );
        assert_eq!(
            shape(&thread),
            vec![
                (String::from("b"), 0),
                (String::from("b2"), 1),
                (String::from("b1"), 1),
                (String::from("a"), 0),
                (String::from("a1"), 1),
            ]
        );
    }

    #[test]
    fn dangling_parents_are_hidden_by_default() {
        let comments = [
            comment("1", None),
            comment("2", Some("gone")),
            comment("3", Some("2")),
        ];
        let thread = Thread::build(&comments, &ThreadConfig::default());
        assert_eq!(shape(&thread), vec![(String::from("1"), 0)]);
        let orphans = thread.orphans().iter().map(|c| &c.id.0 as &str).collect::<Vec<_>>();
        assert_eq!(orphans, vec!["2", "3"]);
        assert_eq!(thread.num_hidden(), 2);
    }

    #[test]
    fn dangling_parents_can_be_promoted() {
        // the reply is listed before its orphaned parent on purpose
        let comments = [
            comment("3", Some("2")),
            comment("1", None),
            comment("2", Some("gone")),
        ];
        let config = ThreadConfig {
            orphans: OrphanPolicy::PromoteToRoot,
            ..ThreadConfig::default()
        };
        let thread = Thread::build(&comments, &config);
        assert_eq!(
            shape(&thread),
            vec![
                (String::from("1"), 0),
                (String::from("2"), 0),
                (String::from("3"), 1),
            ]
        );
        assert_eq!(thread.orphans().len(), 2);
        assert_eq!(thread.num_hidden(), 0);
    }

    #[test]
    fn cycles_and_duplicates_terminate() {
        let comments = [
            comment("1", Some("1")),
            comment("2", Some("3")),
            comment("3", Some("2")),
            comment("4", None),
            comment("4", Some("4")),
        ];
        let thread = Thread::build(&comments, &ThreadConfig::default());
        assert_eq!(
            shape(&thread),
            vec![(String::from("4"), 0), (String::from("4"), 1)]
        );
        assert_eq!(thread.orphans().len(), 3);

        let config = ThreadConfig {
            orphans: OrphanPolicy::PromoteToRoot,
            ..ThreadConfig::default()
        };
        assert_eq!(Thread::build(&comments, &config).iter().count(), 5);
    }

    #[test]
    fn empty_list_gives_empty_thread() {
        let thread = Thread::build(&[], &ThreadConfig::default());
        assert!(thread.is_empty());
        assert_eq!(thread.iter().count(), 0);
    }

    /// Walk the parent chain by hand, returning the depth if a root is reached
    fn expected_depth(parents: &[Option<usize>], mut i: usize) -> Option<usize> {
        let mut depth = 0;
        while let Some(p) = parents[i] {
            if p >= parents.len() || depth > parents.len() {
                return None;
            }
            depth += 1;
            i = p;
        }
        Some(depth)
    }

    fn collect_positions(
        nodes: &[ThreadNode],
        parent: Option<&str>,
        into: &mut HashMap<String, Vec<(Option<String>, usize, usize)>>,
    ) {
        for n in nodes {
            into.entry(n.comment.id.0.clone()).or_default().push((
                parent.map(String::from),
                n.level,
                n.depth,
            ));
            collect_positions(&n.replies, Some(&n.comment.id.0), into);
        }
    }

    #[test]
    fn every_reachable_comment_appears_once_under_its_parent() {
        bolero::check!()
            .with_type::<Vec<Option<u8>>>()
            .cloned()
            .for_each(|raw| {
                // Parent indices may point past the end of the list, making
                // dangling references
                let parents = raw
                    .iter()
                    .map(|p| p.map(|p| p as usize % (raw.len() + 2)))
                    .collect::<Vec<_>>();
                let comments = parents
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        comment(&i.to_string(), p.map(|p| p.to_string()).as_deref())
                    })
                    .collect::<Vec<_>>();
                let config = ThreadConfig::default();
                let thread = Thread::build(&comments, &config);

                let mut positions = HashMap::new();
                collect_positions(thread.roots(), None, &mut positions);
                for (i, p) in parents.iter().enumerate() {
                    let found = positions.get(&i.to_string());
                    match expected_depth(&parents, i) {
                        None => {
                            assert!(found.is_none(), "orphan {i} was rendered");
                            assert!(thread.orphans().iter().any(|c| c.id.0 == i.to_string()));
                        }
                        Some(depth) => {
                            let found = found.expect("reachable comment was not rendered");
                            assert_eq!(found.len(), 1, "comment {i} rendered several times");
                            let (parent, level, found_depth) = &found[0];
                            assert_eq!(*parent, p.map(|p| p.to_string()));
                            assert_eq!(*found_depth, depth);
                            assert_eq!(*level, depth.min(config.max_indent));
                        }
                    }
                }
            });
    }
}
