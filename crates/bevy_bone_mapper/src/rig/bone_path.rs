use std::fmt;

use bevy::ecs::{entity::Entity, world::World};

use super::hierarchy::{entity_name, parent};

/// Names of every entity from the top of a hierarchy down to a bone.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Default)]
pub struct BonePath {
    pub parts: Vec<String>,
}

impl BonePath {
    /// Path of `bone`, starting at the topmost ancestor it has in `world`.
    pub fn of(world: &World, bone: Entity) -> Self {
        let mut parts = vec![];
        let mut current = Some(bone);
        while let Some(cur) = current {
            parts.push(entity_name(world, cur).to_string());
            current = parent(world, cur);
        }
        parts.reverse();
        Self { parts }
    }

    pub fn first(&self) -> Option<&str> {
        self.parts.first().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.parts.last().map(String::as_str)
    }

    /// Whether the path has at least one ancestor and ends in `leaf`.
    ///
    /// A lone top-level segment never matches: it has no naming context above it.
    pub fn ends_with_leaf(&self, leaf: &str) -> bool {
        self.parts.len() > 1 && self.last() == Some(leaf)
    }

    /// Returns a string representation of the path, with '/' as the separator. If any path parts
    /// themselves contain '/', they will be escaped
    pub fn to_slashed_string(&self) -> String {
        self.parts
            .iter()
            .map(|part| part.replace('\\', "\\\\").replace('/', "\\/"))
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn from_slashed_string(path: &str) -> Self {
        Self {
            parts: (SlashedParts { s: path.chars() }).collect(),
        }
    }
}

impl fmt::Display for BonePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_slashed_string())
    }
}

impl From<Vec<String>> for BonePath {
    fn from(parts: Vec<String>) -> Self {
        Self { parts }
    }
}

struct SlashedParts<'a> {
    s: std::str::Chars<'a>,
}

impl Iterator for SlashedParts<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let mut part = String::new();
        let mut saw_any = false;

        while let Some(c) = self.s.next() {
            saw_any = true;
            match c {
                '\\' => match self.s.next() {
                    None => part.push('\\'),
                    Some('/') => part.push('/'),
                    Some('\\') => part.push('\\'),
                    Some(c) => {
                        part.push('\\');
                        part.push(c);
                    }
                },
                '/' => return Some(part),
                c => part.push(c),
            }
        }

        saw_any.then_some(part)
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::{hierarchy::ChildOf, name::Name};

    use super::*;

    #[test]
    fn path_walks_up_to_top_level() {
        let mut world = World::new();
        let root = world.spawn(Name::new("Root")).id();
        let spine = world.spawn((Name::new("Spine"), ChildOf(root))).id();
        let neck = world.spawn((Name::new("Neck"), ChildOf(spine))).id();

        let path = BonePath::of(&world, neck);
        assert_eq!(path.to_slashed_string(), "Root/Spine/Neck");
        assert_eq!(path.first(), Some("Root"));
        assert!(path.ends_with_leaf("Neck"));
        assert!(!BonePath::of(&world, root).ends_with_leaf("Root"));
    }

    #[test]
    fn slashed_string_escapes_separators() {
        let path = BonePath::from(vec!["rig".to_string(), "arm/L".to_string()]);
        assert_eq!(path.to_slashed_string(), "rig/arm\\/L");
        assert_eq!(BonePath::from_slashed_string("rig/arm\\/L"), path);
    }
}
