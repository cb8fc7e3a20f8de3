//! Money Tycoon セーブデータのエンコード/デコード。
//!
//! ## フォーマット
//!
//! セーブ文字列は `SaveData` の JSON を hex でエンコードしたもの。
//! 難読化のためであって、改ざん防止ではない。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 現在のセーブ形式バージョン。フィールド追加時にインクリメントする。
//! - `MIN_COMPATIBLE_VERSION`: 互換性を維持できる最小バージョン。
//!   既存フィールドの意味変更や削除など破壊的変更を行った場合のみインクリメントする。
//!
//! 旧バージョンのセーブデータは、不足フィールドを新規ゲームの値で補完して読み込む。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::achievements::{AchievementId, Achievements};
use super::state::{EconomyState, GeneratorId};
use crate::error::{Result, SaveError};

/// セーブデータのフォーマットバージョン。
pub const SAVE_VERSION: u32 = 1;

/// 互換性を維持できる最小バージョン。
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// 所持数・レベル・プレステージ回数の上限。これを超えるセーブは不正とみなす。
pub const MAX_SAVED_COUNT: u32 = 1_000_000;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct AchievementSave {
    id: String,
    unlocked: bool,
}

/// シリアライズ用のセーブデータ構造体。
///
/// 欠けているフィールドは `Default` (= 新規ゲームの値) で埋まる。
/// `currency` だけは `None` のままになり、デコード時に拒否される。
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
struct SaveData {
    version: u32,
    currency: Option<f64>,
    total_earned: f64,
    total_clicks: u64,
    /// 表示用に書き出すだけで、ロード時には使わない。
    time_elapsed_seconds: u64,
    click_power: f64,
    click_upgrade_level: u32,
    crit_chance_percent: f64,
    crit_upgrade_level: u32,
    prestige_points: u64,
    prestige_multiplier: f64,
    total_prestige_count: u32,
    /// generator key → 所持数。コストは所持数から再計算する。
    generators: BTreeMap<String, u32>,
    biggest_single_click: f64,
    total_money_from_clicks: f64,
    total_money_from_businesses: f64,
    selected_theme: String,
    auto_save_enabled: bool,
    achievements: Vec<AchievementSave>,
}

impl Default for SaveData {
    fn default() -> Self {
        let mut data = extract_save(&EconomyState::new(), &Achievements::new());
        data.version = MIN_COMPATIBLE_VERSION;
        data.currency = None;
        data
    }
}

/// 状態からセーブ用データを抽出する。
fn extract_save(state: &EconomyState, achievements: &Achievements) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        currency: Some(state.currency),
        total_earned: state.total_earned,
        total_clicks: state.total_clicks,
        time_elapsed_seconds: state.time_elapsed_seconds,
        click_power: state.click_power,
        click_upgrade_level: state.click_upgrade_level,
        crit_chance_percent: state.crit_chance_percent,
        crit_upgrade_level: state.crit_upgrade_level,
        prestige_points: state.prestige_points,
        prestige_multiplier: state.prestige_multiplier,
        total_prestige_count: state.total_prestige_count,
        generators: state
            .generators
            .iter()
            .map(|g| (g.id.key().to_string(), g.owned))
            .collect(),
        biggest_single_click: state.biggest_single_click,
        total_money_from_clicks: state.total_money_from_clicks,
        total_money_from_businesses: state.total_money_from_businesses,
        selected_theme: state.selected_theme.clone(),
        auto_save_enabled: state.auto_save_enabled,
        achievements: achievements
            .iter()
            .map(|a| AchievementSave {
                id: a.def.id.key().to_string(),
                unlocked: a.unlocked,
            })
            .collect(),
    }
}

/// 上限を超える所持数・レベルを拒否する。
fn check_counts(save: &SaveData) -> Result<()> {
    let counts = save
        .generators
        .iter()
        .map(|(key, &owned)| (key.as_str(), owned))
        .chain([
            ("click_upgrade_level", save.click_upgrade_level),
            ("crit_upgrade_level", save.crit_upgrade_level),
            ("total_prestige_count", save.total_prestige_count),
        ]);
    for (field, value) in counts {
        if value > MAX_SAVED_COUNT {
            return Err(SaveError::OutOfRange {
                field: field.to_string(),
                value: value as u64,
                max: MAX_SAVED_COUNT as u64,
            });
        }
    }
    Ok(())
}

/// セーブデータを新規の状態にマージする。
/// 未知の generator / achievement の id は無視する。
fn apply_save(save: &SaveData, currency: f64) -> (EconomyState, Achievements) {
    let mut state = EconomyState::new();
    let mut achievements = Achievements::new();

    state.currency = currency;
    state.total_earned = save.total_earned;
    state.total_clicks = save.total_clicks;
    state.click_power = save.click_power.max(1.0);
    state.click_upgrade_level = save.click_upgrade_level;
    state.crit_chance_percent = save.crit_chance_percent.clamp(0.0, 50.0);
    state.crit_upgrade_level = save.crit_upgrade_level;
    state.prestige_points = save.prestige_points;
    state.prestige_multiplier = save.prestige_multiplier.max(1.0);
    state.total_prestige_count = save.total_prestige_count;

    for (key, &owned) in &save.generators {
        if let Some(id) = GeneratorId::from_key(key) {
            state.generator_mut(id).set_owned(owned);
        }
    }

    state.biggest_single_click = save.biggest_single_click;
    state.total_money_from_clicks = save.total_money_from_clicks;
    state.total_money_from_businesses = save.total_money_from_businesses;
    state.selected_theme = save.selected_theme.clone();
    state.auto_save_enabled = save.auto_save_enabled;

    for saved in &save.achievements {
        if !saved.unlocked {
            continue;
        }
        if let Some(id) = AchievementId::from_key(&saved.id) {
            achievements.restore(id);
        }
    }

    (state, achievements)
}

/// 状態をセーブ文字列にエンコードする。
/// JSON は inf / NaN を表現できないので、非有限の値があればエラーにする。
pub fn encode(state: &EconomyState, achievements: &Achievements) -> Result<String> {
    let floats = [
        ("currency", state.currency),
        ("total_earned", state.total_earned),
        ("click_power", state.click_power),
        ("crit_chance_percent", state.crit_chance_percent),
        ("prestige_multiplier", state.prestige_multiplier),
        ("biggest_single_click", state.biggest_single_click),
        ("total_money_from_clicks", state.total_money_from_clicks),
        ("total_money_from_businesses", state.total_money_from_businesses),
    ];
    if let Some(&(field, _)) = floats.iter().find(|(_, v)| !v.is_finite()) {
        return Err(SaveError::NonFinite { field });
    }
    let json = serde_json::to_vec(&extract_save(state, achievements))?;
    Ok(hex::encode(json))
}

/// セーブ文字列をデコードし、新規の状態にマージしたものを返す。
/// 失敗しても呼び出し側の状態には一切触れない。
pub fn decode(blob: &str) -> Result<(EconomyState, Achievements)> {
    let bytes = hex::decode(blob.trim())?;
    let save: SaveData = serde_json::from_slice(&bytes)?;

    if save.version < MIN_COMPATIBLE_VERSION {
        return Err(SaveError::IncompatibleVersion {
            saved: save.version,
            min_compatible: MIN_COMPATIBLE_VERSION,
        });
    }

    let currency = match save.currency {
        Some(c) if c.is_finite() && c >= 0.0 => c,
        _ => return Err(SaveError::MissingCurrency),
    };
    check_counts(&save)?;

    Ok(apply_save(&save, currency))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tycoon::formula;
    use crate::tycoon::state::generator_cost_for;

    fn hex_json(json: &str) -> String {
        hex::encode(json.as_bytes())
    }

    #[test]
    fn encode_and_decode_roundtrip() {
        let mut original = EconomyState::new();
        original.currency = 12_345.678_901_234_5;
        original.total_earned = 98_765_432.123_456_79;
        original.total_clicks = 4_242;
        original.time_elapsed_seconds = 3_600;
        original.click_power = 57.0;
        original.click_upgrade_level = 7;
        original.crit_chance_percent = 15.0;
        original.crit_upgrade_level = 3;
        original.prestige_points = 12;
        original.prestige_multiplier = (1.0 + 12.0 * 0.1 + 0.1) * 1.1;
        original.total_prestige_count = 4;
        original.generator_mut(GeneratorId::Lemonade).set_owned(25);
        original.generator_mut(GeneratorId::Oil).set_owned(3);
        original.biggest_single_click = 570.1;
        original.total_money_from_clicks = 1.0 / 3.0;
        original.total_money_from_businesses = 2.0_f64.sqrt();
        original.selected_theme = "neon".into();
        original.auto_save_enabled = false;

        let mut book = Achievements::new();
        book.restore(AchievementId::FirstClick);
        book.restore(AchievementId::FirstBusiness);
        book.restore(AchievementId::Millionaire);

        let blob = encode(&original, &book).unwrap();
        let (restored, restored_book) = decode(&blob).unwrap();

        let mut expected = original.clone();
        expected.time_elapsed_seconds = 0;
        assert_eq!(restored, expected);
        assert_eq!(restored_book, book);
        assert_eq!(restored_book.unlocked_count(), 3);
    }

    #[test]
    fn blob_is_plain_hex() {
        let blob = encode(&EconomyState::new(), &Achievements::new()).unwrap();
        assert!(blob.chars().all(|c| c.is_ascii_hexdigit()));
        let json = String::from_utf8(hex::decode(&blob).unwrap()).unwrap();
        assert!(json.contains("\"version\":1"));
        assert!(json.contains("\"lemonade\":0"));
        assert!(json.contains("\"first_click\""));
    }

    #[test]
    fn missing_currency_is_rejected() {
        let blob = hex_json(r#"{"version": 1, "total_earned": 5.0}"#);
        assert!(matches!(decode(&blob), Err(SaveError::MissingCurrency)));
    }

    #[test]
    fn null_or_negative_currency_is_rejected() {
        let blob = hex_json(r#"{"currency": null}"#);
        assert!(matches!(decode(&blob), Err(SaveError::MissingCurrency)));
        let blob = hex_json(r#"{"currency": -5.0}"#);
        assert!(matches!(decode(&blob), Err(SaveError::MissingCurrency)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(decode("not hex at all"), Err(SaveError::Encoding(_))));
        assert!(matches!(decode(&hex_json("{oops")), Err(SaveError::Json(_))));
        assert!(matches!(decode(&hex_json("42")), Err(SaveError::Json(_))));
        assert!(matches!(decode(""), Err(SaveError::Json(_))));
    }

    #[test]
    fn version_below_min_compatible_is_rejected() {
        let blob = hex_json(r#"{"version": 0, "currency": 10.0}"#);
        assert!(matches!(
            decode(&blob),
            Err(SaveError::IncompatibleVersion { saved: 0, .. })
        ));
    }

    /// 旧バージョン (フィールドが少ない) の JSON は新規ゲームの値で補完される。
    #[test]
    fn missing_fields_take_defaults() {
        let blob = hex_json(
            r#"{
                "currency": 5000.0,
                "total_earned": 10000.0,
                "generators": { "pizza": 4 }
            }"#,
        );
        let (state, book) = decode(&blob).unwrap();
        assert!((state.currency - 5000.0).abs() < 0.001);
        assert!((state.total_earned - 10000.0).abs() < 0.001);
        assert_eq!(state.generator(GeneratorId::Pizza).owned, 4);
        assert_eq!(
            state.generator(GeneratorId::Pizza).current_cost,
            (1100.0 * 1.15_f64.powf(4.0)).floor()
        );
        // Absent fields come from a fresh game, not zero.
        assert!((state.click_power - 1.0).abs() < 0.001);
        assert!((state.prestige_multiplier - 1.0).abs() < 0.001);
        assert!(state.auto_save_enabled);
        assert_eq!(state.selected_theme, "default");
        assert_eq!(state.generator(GeneratorId::Lemonade).owned, 0);
        assert_eq!(book.unlocked_count(), 0);
    }

    #[test]
    fn unknown_ids_and_fields_are_ignored() {
        let blob = hex_json(
            r#"{
                "version": 1,
                "currency": 1.0,
                "generators": { "casino": 9, "bank": 2 },
                "achievements": [
                    { "id": "secret_cow_level", "unlocked": true },
                    { "id": "speed_demon", "unlocked": true },
                    { "id": "first_click", "unlocked": false }
                ],
                "future_unknown_field": "should be ignored"
            }"#,
        );
        let (state, book) = decode(&blob).unwrap();
        assert_eq!(state.generator(GeneratorId::Bank).owned, 2);
        assert_eq!(state.total_generators_owned(), 2);
        assert!(book.is_unlocked(AchievementId::SpeedDemon));
        assert!(!book.is_unlocked(AchievementId::FirstClick));
        assert_eq!(book.unlocked_count(), 1);
    }

    #[test]
    fn elapsed_time_is_not_restored() {
        let mut state = EconomyState::new();
        state.time_elapsed_seconds = 9_999;
        let blob = encode(&state, &Achievements::new()).unwrap();
        let (restored, _) = decode(&blob).unwrap();
        assert_eq!(restored.time_elapsed_seconds, 0);
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let blob = encode(&EconomyState::new(), &Achievements::new()).unwrap();
        assert!(decode(&format!("  {blob}\n")).is_ok());
    }

    #[test]
    fn oversized_counts_are_rejected() {
        let blob = hex_json(r#"{"currency": 0.0, "generators": {"lemonade": 4294967295, "pizza": 1}}"#);
        assert!(matches!(
            decode(&blob),
            Err(SaveError::OutOfRange { ref field, value: 4_294_967_295, .. }) if field == "lemonade"
        ));

        let blob = hex_json(r#"{"currency": 100.0, "click_upgrade_level": 4294967295}"#);
        let err = decode(&blob).unwrap_err();
        assert!(err.is_invalid_data());
        assert!(matches!(err, SaveError::OutOfRange { ref field, .. } if field == "click_upgrade_level"));

        let blob = hex_json(r#"{"currency": 1.0, "total_prestige_count": 1000001}"#);
        assert!(matches!(decode(&blob), Err(SaveError::OutOfRange { .. })));
    }

    #[test]
    fn counts_at_the_limit_keep_the_cost_law() {
        let blob = hex_json(r#"{"currency": 0.0, "generators": {"lemonade": 1000000}, "crit_upgrade_level": 1000000}"#);
        let (mut state, book) = decode(&blob).unwrap();
        let lemonade = state.generator(GeneratorId::Lemonade);
        assert_eq!(lemonade.owned, MAX_SAVED_COUNT);
        assert_eq!(lemonade.current_cost, generator_cost_for(GeneratorId::Lemonade, MAX_SAVED_COUNT));
        assert!(lemonade.current_cost.is_infinite());
        assert_eq!(state.total_generators_owned(), MAX_SAVED_COUNT);

        // Nothing is affordable, and nothing overflows trying.
        state.currency = f64::MAX;
        assert!(!formula::buy_generator(&mut state, GeneratorId::Lemonade));
        assert!(!formula::buy_crit_upgrade(&mut state, &book));
    }

    #[test]
    fn non_finite_values_are_not_encoded() {
        let mut state = EconomyState::new();
        state.total_earned = f64::INFINITY;
        assert!(matches!(
            encode(&state, &Achievements::new()),
            Err(SaveError::NonFinite { field: "total_earned" })
        ));
        state.total_earned = 0.0;
        state.currency = f64::NAN;
        assert!(matches!(
            encode(&state, &Achievements::new()),
            Err(SaveError::NonFinite { field: "currency" })
        ));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let blob = hex_json(
            r#"{"currency": 1.0, "crit_chance_percent": 90.0, "click_power": 0.0, "prestige_multiplier": 0.5}"#,
        );
        let (state, _) = decode(&blob).unwrap();
        assert_eq!(state.crit_chance_percent, 50.0);
        assert_eq!(state.click_power, 1.0);
        assert_eq!(state.prestige_multiplier, 1.0);
    }
}
