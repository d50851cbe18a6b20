use super::config::GameConfig;
use super::geometry::Aabb;
use super::horde::{Bullet, Zombie};
use super::powerup::PowerUp;
use super::traffic::Vehicle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cause {
    Vehicle,
    Zombie,
}

/// A sinking vehicle has left the road surface and cannot hit anything.
pub fn struck_by_vehicle(player: &Aabb, vehicles: &[Vehicle], config: &GameConfig) -> bool {
    vehicles
        .iter()
        .any(|v| !v.sinking && v.bounds(config).overlaps(player))
}

pub fn caught_by_zombie(player: &Aabb, zombies: &[Zombie], config: &GameConfig) -> bool {
    zombies
        .iter()
        .any(|z| !z.sinking && z.bounds(config).overlaps(player))
}

/// Removes and returns every pickup under the player, in registry order.
pub fn collect_power_ups(player: &Aabb, power_ups: &mut Vec<PowerUp>) -> Vec<PowerUp> {
    let mut collected = Vec::new();
    power_ups.retain(|p| {
        if p.bounds().overlaps(player) {
            collected.push(p.clone());
            false
        } else {
            true
        }
    });
    collected
}

/// Each bullet hits at most one zombie and is used up. Returns the number of zombies killed.
pub fn resolve_bullets(bullets: &mut Vec<Bullet>, zombies: &mut Vec<Zombie>, config: &GameConfig) -> u32 {
    bullets.retain(|bullet| {
        let shot = bullet.bounds(config);
        match zombies
            .iter_mut()
            .find(|z| !z.sinking && z.health > 0 && z.bounds(config).overlaps(&shot))
        {
            Some(zombie) => {
                zombie.health -= 1;
                false
            }
            None => true,
        }
    });

    let before = zombies.len();
    zombies.retain(|z| z.health > 0);
    (before - zombies.len()) as u32
}
