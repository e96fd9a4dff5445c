//! Guesses a humanoid description for a model from its bone names.
//!
//! Names are normalised (rig prefixes such as `mixamorig:` stripped, lowercased, separators
//! removed), their side is read from `left`/`right` words or `l`/`r` prefixes and suffixes, and
//! the remainder is classified by a fixed rule list. The first bone in depth-first order wins
//! each role. Numbered spine bones (`spine`, `spine1`, ...) fill whichever of `Spine`, `Chest`
//! and `UpperChest` no bone claimed explicitly, from the hips upwards, and never above an
//! explicit torso bone that sits below them.

use std::fmt;

use bevy::{log::debug, platform::collections::HashSet};
use regex::Regex;

use super::serial::{BoneSerial, RigSerial};
use crate::{bone_role::BoneRole, rig::HumanDescription};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("Left"),
            Side::Right => f.write_str("Right"),
        }
    }
}

#[derive(Debug, Clone)]
enum Part {
    Unsided(BoneRole),
    /// Role name without its `Left`/`Right` prefix
    Sided(&'static str),
    Finger,
    Spine,
}

pub struct HumanoidAutoMapper {
    prefix: Regex,
    left: Regex,
    right: Regex,
    finger: Regex,
    rules: Vec<(Regex, Part)>,
}

impl Default for HumanoidAutoMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanoidAutoMapper {
    pub fn new() -> Self {
        let rule = |pattern: &str, part: Part| (compile(pattern), part);

        Self {
            prefix: compile(r"^(mixamorig\d*[:_]|bip0?1[ _]?|def[-_]|armature[|:])"),
            left: compile(r"^(left|l[._ -])|[._ -]l$|left"),
            right: compile(r"^(right|r[._ -])|[._ -]r$|right"),
            finger: compile(
                r"(thumb|index|middle|ring|pinky|little)(proximal|intermediate|distal|0?[123])?$",
            ),
            rules: vec![
                rule(r"(thumb|index|middle|ring|pinky|little)", Part::Finger),
                rule(r"toe|ball", Part::Sided("Toes")),
                rule(r"eye", Part::Sided("Eye")),
                rule(r"^jaw", Part::Unsided(BoneRole::Jaw)),
                rule(r"^head$", Part::Unsided(BoneRole::Head)),
                rule(r"^neck\d*$", Part::Unsided(BoneRole::Neck)),
                rule(r"shoulder|clavicle|collar", Part::Sided("Shoulder")),
                rule(r"lowerarm|forearm|elbow", Part::Sided("LowerArm")),
                rule(r"upperarm|^uparm$|^arm$", Part::Sided("UpperArm")),
                rule(r"^hand$|wrist", Part::Sided("Hand")),
                rule(r"lowerleg|^leg$|calf|shin|knee", Part::Sided("LowerLeg")),
                rule(r"upperleg|upleg|thigh|^hip$", Part::Sided("UpperLeg")),
                rule(r"foot|ankle", Part::Sided("Foot")),
                rule(r"^(hips|pelvis)$", Part::Unsided(BoneRole::Hips)),
                rule(r"^upperchest$", Part::Unsided(BoneRole::UpperChest)),
                rule(r"^chest$", Part::Unsided(BoneRole::Chest)),
                rule(r"^spine\d*$", Part::Spine),
            ],
        }
    }

    pub fn map(&self, rig: &RigSerial) -> HumanDescription {
        let mut description = HumanDescription::default();
        let mut taken: HashSet<BoneRole> = HashSet::default();
        let mut spine_chain = vec![];

        // Each entry carries the deepest torso role already claimed by one of its ancestors.
        let mut pending: Vec<(&BoneSerial, Option<usize>)> = vec![(&rig.root, None)];
        while let Some((bone, floor)) = pending.pop() {
            let mut child_floor = floor;
            match self.classify(&bone.name) {
                Some(Classified::Role(role)) => {
                    if taken.insert(role) {
                        description.push(role, &bone.name);
                        if let Some(level) = torso_level(role) {
                            child_floor = child_floor.max(Some(level));
                        }
                    }
                }
                Some(Classified::Spine) => spine_chain.push((bone.name.as_str(), floor)),
                None => {}
            }
            for child in bone.children.iter().rev() {
                pending.push((child, child_floor));
            }
        }

        let mut last = None;
        for (name, floor) in spine_chain {
            // Explicit torso bones that are not ancestors sit below this one.
            let ceiling = TORSO
                .iter()
                .enumerate()
                .filter(|(level, role)| Some(*level) > floor && taken.contains(*role))
                .map(|(level, _)| level)
                .min()
                .unwrap_or(TORSO.len());
            let lowest = floor.max(last).map_or(0, |level| level + 1);
            let mut free = (lowest..ceiling).filter(|level| !taken.contains(&TORSO[*level]));
            let Some(level) = free.next() else {
                continue;
            };
            description.push(TORSO[level], name);
            taken.insert(TORSO[level]);
            last = Some(level);
        }

        debug!(
            "Auto-mapped {} humanoid roles from {} bones",
            description.human.len(),
            rig.bone_names().len()
        );

        description
    }

    fn classify(&self, name: &str) -> Option<Classified> {
        let lowered = name.to_lowercase();
        let unprefixed = self.prefix.replace(&lowered, "");

        let side = if self.left.is_match(&unprefixed) {
            Some(Side::Left)
        } else if self.right.is_match(&unprefixed) {
            Some(Side::Right)
        } else {
            None
        };

        let sideless = match side {
            Some(Side::Left) => self.left.replace_all(&unprefixed, ""),
            Some(Side::Right) => self.right.replace_all(&unprefixed, ""),
            None => unprefixed.clone(),
        };
        let part_name: String = sideless
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        let (_, part) = self
            .rules
            .iter()
            .find(|(regex, _)| regex.is_match(&part_name))?;

        match part {
            Part::Unsided(role) => Some(Classified::Role(*role)),
            Part::Spine => Some(Classified::Spine),
            Part::Sided(suffix) => {
                let role = format!("{}{}", side?, suffix).parse().ok()?;
                Some(Classified::Role(role))
            }
            Part::Finger => self.finger_role(side?, &part_name).map(Classified::Role),
        }
    }

    fn finger_role(&self, side: Side, part_name: &str) -> Option<BoneRole> {
        let captures = self.finger.captures(part_name)?;
        let finger = match &captures[1] {
            "thumb" => "Thumb",
            "index" => "Index",
            "middle" => "Middle",
            "ring" => "Ring",
            _ => "Little",
        };
        let segment = match captures.get(2).map(|m| m.as_str()) {
            None | Some("proximal" | "1" | "01") => "Proximal",
            Some("intermediate" | "2" | "02") => "Intermediate",
            Some(_) => "Distal",
        };
        format!("{side}{finger}{segment}").parse().ok()
    }
}

enum Classified {
    Role(BoneRole),
    Spine,
}

/// Torso roles from the hips upwards.
const TORSO: [BoneRole; 3] = [BoneRole::Spine, BoneRole::Chest, BoneRole::UpperChest];

fn torso_level(role: BoneRole) -> Option<usize> {
    TORSO.iter().position(|torso| *torso == role)
}

fn compile(pattern: &str) -> Regex {
    // Patterns are fixed at compile time; a failure here is a programming error.
    Regex::new(pattern)
        .unwrap_or_else(|err| panic!("invalid auto-mapper pattern {pattern:?}: {err}"))
}
