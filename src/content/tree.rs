//! Threaded comment tree with a nesting cap
//!
//! Comments arrive as a flat, parent-linked list. The tree assigns each one a
//! display depth: roots are depth 1 and a reply sits one level below its
//! parent. Once a branch reaches `max_depth`, further replies are not nested;
//! they follow their ancestor as siblings at `max_depth`, in thread order.

use std::collections::{HashMap, HashSet};

use super::Comment;

/// A comment placed in the tree
#[derive(Debug, Clone)]
pub struct CommentNode {
    pub comment: Comment,
    /// 1-based display depth, never above the tree's `max_depth`
    pub depth: u32,
    pub children: Vec<CommentNode>,
}

/// Comments of one post arranged for display
#[derive(Debug, Clone)]
pub struct CommentTree {
    roots: Vec<CommentNode>,
    max_depth: u32,
    len: usize,
}

impl CommentTree {
    /// Arrange `comments` into threads. Replies whose parent is not in the
    /// list (deleted, or pending and hidden from this viewer) become roots.
    pub fn build(mut comments: Vec<Comment>, max_depth: u32) -> Self {
        let max_depth = max_depth.max(1);
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let ids: HashSet<i64> = comments.iter().map(|c| c.id).collect();
        let mut by_parent: HashMap<Option<i64>, Vec<Comment>> = HashMap::new();
        for comment in comments {
            let parent = comment.parent_id.filter(|p| ids.contains(p) && *p != comment.id);
            by_parent.entry(parent).or_default().push(comment);
        }

        let mut builder = Builder {
            by_parent,
            max_depth,
            placed: 0,
        };
        let mut roots = Vec::new();
        builder.place(None, 1, &mut roots);

        Self {
            roots,
            max_depth,
            len: builder.placed,
        }
    }

    pub fn roots(&self) -> &[CommentNode] {
        &self.roots
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Number of comments placed in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Depth-first walk in display order
    pub fn walk(&self) -> Vec<&CommentNode> {
        fn visit<'a>(nodes: &'a [CommentNode], out: &mut Vec<&'a CommentNode>) {
            for node in nodes {
                out.push(node);
                visit(&node.children, out);
            }
        }
        let mut out = Vec::with_capacity(self.len);
        visit(&self.roots, &mut out);
        out
    }

    pub fn find(&self, id: i64) -> Option<&CommentNode> {
        self.walk().into_iter().find(|n| n.comment.id == id)
    }
}

struct Builder {
    by_parent: HashMap<Option<i64>, Vec<Comment>>,
    max_depth: u32,
    placed: usize,
}

impl Builder {
    fn place(&mut self, parent: Option<i64>, depth: u32, out: &mut Vec<CommentNode>) {
        let Some(children) = self.by_parent.remove(&parent) else {
            return;
        };

        for comment in children {
            let id = comment.id;
            self.placed += 1;

            if depth < self.max_depth {
                let mut nested = Vec::new();
                self.place(Some(id), depth + 1, &mut nested);
                out.push(CommentNode {
                    comment,
                    depth,
                    children: nested,
                });
            } else {
                // At the cap: descendants continue in this list
                out.push(CommentNode {
                    comment,
                    depth,
                    children: Vec::new(),
                });
                self.place(Some(id), depth, out);
            }
        }
    }
}
