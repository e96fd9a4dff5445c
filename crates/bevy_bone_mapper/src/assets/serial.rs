use serde::{Deserialize, Serialize};

/// On-disk form of a model: a named bone hierarchy with rest transforms.
///
/// ```ron
/// (
///     root: (
///         name: "Armature",
///         children: [
///             (name: "Hips", translation: (0.0, 1.0, 0.0), children: [/* ... */]),
///         ],
///     ),
/// )
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RigSerial {
    pub root: BoneSerial,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BoneSerial {
    pub name: String,
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    #[serde(default)]
    pub children: Vec<BoneSerial>,
}

fn identity_rotation() -> [f32; 4] {
    [0., 0., 0., 1.]
}

impl RigSerial {
    pub fn new(root: BoneSerial) -> Self {
        Self { root }
    }

    /// Bone names in depth-first, first-child-first order.
    pub fn bone_names(&self) -> Vec<&str> {
        let mut names = vec![];
        let mut pending = vec![&self.root];
        while let Some(bone) = pending.pop() {
            names.push(bone.name.as_str());
            pending.extend(bone.children.iter().rev());
        }
        names
    }
}

impl BoneSerial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            translation: [0.; 3],
            rotation: identity_rotation(),
            children: vec![],
        }
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = BoneSerial>) -> Self {
        self.children.extend(children);
        self
    }

    /// A chain of single-child bones, outermost first.
    pub fn chain<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let mut names: Vec<&str> = names.into_iter().collect();
        let mut bone = BoneSerial::new(names.pop()?);
        while let Some(name) = names.pop() {
            bone = BoneSerial::new(name).with_children([bone]);
        }
        Some(bone)
    }
}
