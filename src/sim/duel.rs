//! Duel: paddle and ball against a scripted opponent
//!
//! The player defends the left side, the opponent the right. There is no
//! terminal state; the match runs until the host stops it.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::{Rect, ball_rect_collision, clamp_speed, reflect_velocity};
use super::effect::Effects;
use super::intent::{Direction, Intent};
use crate::config::DuelConfig;

/// Which side scored or is being served toward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Opponent,
}

#[derive(Debug, Clone)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone)]
pub struct DuelState {
    pub ball: Ball,
    /// Top edge of the player paddle
    pub player_y: f32,
    /// Top edge of the opponent paddle
    pub opponent_y: f32,
    pub player_score: u32,
    pub opponent_score: u32,
    /// Paddle contacts in the current rally
    pub rally: u32,
    pub ticks: u64,
    config: DuelConfig,
    rng: Pcg32,
}

impl DuelState {
    pub fn new(config: &DuelConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let toward = if rng.random_bool(0.5) {
            Side::Player
        } else {
            Side::Opponent
        };
        let mid = config.paddle_travel() / 2.0;
        let mut state = Self {
            ball: Ball {
                pos: Vec2::ZERO,
                vel: Vec2::ZERO,
                radius: config.ball_radius,
            },
            player_y: mid,
            opponent_y: mid,
            player_score: 0,
            opponent_score: 0,
            rally: 0,
            ticks: 0,
            config: config.clone(),
            rng,
        };
        state.serve(toward);
        state
    }

    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    pub fn player_rect(&self) -> Rect {
        let c = &self.config;
        Rect::new(c.paddle_inset, self.player_y, c.paddle_width, c.paddle_height)
    }

    pub fn opponent_rect(&self) -> Rect {
        let c = &self.config;
        Rect::new(
            c.field_width - c.paddle_inset - c.paddle_width,
            self.opponent_y,
            c.paddle_width,
            c.paddle_height,
        )
    }

    /// Reset the ball to the center, heading toward `toward`
    pub fn serve(&mut self, toward: Side) {
        let speed = self.config.serve_speed;
        let dir_x = match toward {
            Side::Player => -1.0,
            Side::Opponent => 1.0,
        };
        let vy = self.rng.random_range(-0.5f32..=0.5) * speed;
        self.ball.pos = Vec2::new(self.config.field_width / 2.0, self.config.field_height / 2.0);
        self.ball.vel = Vec2::new(dir_x * speed, vy);
        self.rally = 0;
    }

    fn clamp_paddle(&self, y: f32) -> f32 {
        y.clamp(0.0, self.config.paddle_travel())
    }

    /// Scripted opponent: chase the ball's height at a capped speed
    fn steer_opponent(&mut self) {
        let center = self.opponent_y + self.config.paddle_height / 2.0;
        let diff = self.ball.pos.y - center;
        let step = diff.clamp(-self.config.opponent_speed, self.config.opponent_speed);
        self.opponent_y = self.clamp_paddle(self.opponent_y + step);
    }
}

/// Advance the duel by one tick
pub fn tick(state: &mut DuelState, intents: &[Intent]) -> Effects {
    state.ticks += 1;

    for intent in intents {
        match intent {
            Intent::Pointer(y) => state.player_y = state.clamp_paddle(*y),
            Intent::Direction(Direction::Up) => {
                state.player_y = state.clamp_paddle(state.player_y - state.config.key_step)
            }
            Intent::Direction(Direction::Down) => {
                state.player_y = state.clamp_paddle(state.player_y + state.config.key_step)
            }
            _ => {}
        }
    }

    state.steer_opponent();

    let (width, height) = (state.config.field_width, state.config.field_height);
    let ball = &mut state.ball;
    ball.pos += ball.vel;

    // Top and bottom walls
    if ball.pos.y - ball.radius < 0.0 {
        ball.pos.y = ball.radius;
        ball.vel.y = ball.vel.y.abs();
    } else if ball.pos.y + ball.radius > height {
        ball.pos.y = height - ball.radius;
        ball.vel.y = -ball.vel.y.abs();
    }

    // Player paddle: reflect, speed up, add spin
    let player = state.player_rect();
    if state.ball.vel.x < 0.0
        && ball_rect_collision(state.ball.pos, state.ball.radius, &player).hit
    {
        let spin = state.config.spin.abs();
        let kick = if spin > 0.0 {
            state.rng.random_range(-spin..=spin)
        } else {
            0.0
        };
        let ball = &mut state.ball;
        let mut vel = reflect_velocity(ball.vel, Vec2::X) * state.config.speed_up;
        vel.y += kick;
        ball.vel = clamp_speed(vel, state.config.max_speed);
        ball.pos.x = player.max.x + ball.radius;
        state.rally += 1;
    }

    // Opponent paddle: reflect and speed up, no spin
    let opponent = state.opponent_rect();
    if state.ball.vel.x > 0.0
        && ball_rect_collision(state.ball.pos, state.ball.radius, &opponent).hit
    {
        let ball = &mut state.ball;
        let vel = reflect_velocity(ball.vel, Vec2::NEG_X) * state.config.speed_up;
        ball.vel = clamp_speed(vel, state.config.max_speed);
        ball.pos.x = opponent.min.x - ball.radius;
        state.rally += 1;
    }

    // Side boundaries: point to the other side, serve back toward the scorer's
    // opponent (x velocity flips relative to the ball that went out)
    if state.ball.pos.x < 0.0 {
        state.opponent_score += 1;
        log::debug!("Duel: opponent scores ({}-{})", state.player_score, state.opponent_score);
        state.serve(Side::Opponent);
    } else if state.ball.pos.x > width {
        state.player_score += 1;
        log::debug!("Duel: player scores ({}-{})", state.player_score, state.opponent_score);
        state.serve(Side::Player);
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> DuelState {
        DuelState::new(&DuelConfig::default(), 42)
    }

    #[test]
    fn test_serve_from_center() {
        let s = state();
        let c = DuelConfig::default();
        assert_eq!(s.ball.pos, Vec2::new(c.field_width / 2.0, c.field_height / 2.0));
        assert!((s.ball.vel.x.abs() - c.serve_speed).abs() < 0.001);
        assert!(s.ball.vel.y.abs() <= c.serve_speed / 2.0 + 0.001);
    }

    #[test]
    fn test_pointer_clamped_to_travel() {
        let mut s = state();
        tick(&mut s, &[Intent::Pointer(-50.0)]);
        assert_eq!(s.player_y, 0.0);
        tick(&mut s, &[Intent::Pointer(10_000.0)]);
        assert_eq!(s.player_y, s.config().paddle_travel());
    }

    #[test]
    fn test_keys_move_player() {
        let mut s = state();
        let start = s.player_y;
        tick(&mut s, &[Intent::Direction(Direction::Up)]);
        assert_eq!(s.player_y, start - DuelConfig::default().key_step);
        tick(&mut s, &[Intent::Direction(Direction::Down), Intent::Direction(Direction::Down)]);
        assert_eq!(s.player_y, start + DuelConfig::default().key_step);
    }

    #[test]
    fn test_wall_bounce() {
        let mut s = state();
        s.ball.pos = Vec2::new(200.0, 7.0);
        s.ball.vel = Vec2::new(1.0, -3.0);
        tick(&mut s, &[]);
        assert!(s.ball.vel.y > 0.0);
        assert!(s.ball.pos.y >= s.ball.radius);
    }

    #[test]
    fn test_player_paddle_flips_once() {
        let mut s = state();
        s.player_y = 100.0;
        s.ball.pos = Vec2::new(30.0, 130.0);
        s.ball.vel = Vec2::new(-4.0, 0.0);
        let mut flips = 0;
        let mut last_sign = s.ball.vel.x.signum();
        for _ in 0..6 {
            tick(&mut s, &[]);
            let sign = s.ball.vel.x.signum();
            if sign != last_sign {
                flips += 1;
            }
            last_sign = sign;
        }
        assert_eq!(flips, 1);
        assert!(s.ball.vel.x > 0.0);
        assert!(s.ball.vel.length() <= s.config().max_speed + 0.001);
        assert_eq!(s.rally, 1);
    }

    #[test]
    fn test_speed_capped() {
        let mut s = state();
        s.player_y = 100.0;
        s.ball.pos = Vec2::new(26.0, 130.0);
        s.ball.vel = Vec2::new(-8.9, 0.0);
        tick(&mut s, &[]);
        assert!(s.ball.vel.x > 0.0);
        assert!(s.ball.vel.length() <= s.config().max_speed + 0.001);
    }

    #[test]
    fn test_ball_past_player_scores_for_opponent() {
        let mut s = state();
        s.player_y = 0.0;
        s.ball.pos = Vec2::new(2.0, 250.0);
        s.ball.vel = Vec2::new(-4.0, 0.0);
        tick(&mut s, &[]);
        assert_eq!(s.opponent_score, 1);
        assert_eq!(s.player_score, 0);
        let c = DuelConfig::default();
        assert_eq!(s.ball.pos, Vec2::new(c.field_width / 2.0, c.field_height / 2.0));
        assert!(s.ball.vel.x > 0.0);
    }

    #[test]
    fn test_ball_past_opponent_scores_for_player() {
        let mut s = state();
        s.opponent_y = 0.0;
        s.ball.pos = Vec2::new(398.0, 280.0);
        s.ball.vel = Vec2::new(4.0, 0.0);
        tick(&mut s, &[]);
        assert_eq!(s.player_score, 1);
        assert!(s.ball.vel.x < 0.0);
    }

    #[test]
    fn test_opponent_slower_than_ball() {
        let mut s = state();
        s.opponent_y = 0.0;
        s.ball.pos = Vec2::new(200.0, 280.0);
        s.ball.vel = Vec2::new(0.5, 0.0);
        tick(&mut s, &[]);
        assert!((s.opponent_y - s.config().opponent_speed).abs() < 0.001);
    }
}
