/*
 * Responsibility
 * - key (候補キー抽出) と guard (判定) を束ねる
 * - middleware / state に公開する型を制御する
 */
mod guard;
mod key;

pub use guard::AdminGuard;
