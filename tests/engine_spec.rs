use loadbook::cascade::{CascadeController, SelectionState};
use loadbook::filter;
use loadbook::models::*;
use loadbook::taxonomy::{OptionItem, SelectField, TaxonomySnapshot};
use loadbook::validate::{validate_draft, DraftField, Rule, Violation};
use speculate2::speculate;

const RIFLE: i64 = 1;
const PISTOL: i64 = 2;

/// Synthetic taxonomy with known ids: two cartridge types, cartridges and
/// powders split between them, and two bullet weight groups (168gr, 155gr).
fn fixture() -> TaxonomySnapshot {
    TaxonomySnapshot::new(
        vec![
            CartridgeType {
                id: RIFLE,
                name: "Rifle".to_string(),
            },
            CartridgeType {
                id: PISTOL,
                name: "Pistol".to_string(),
            },
        ],
        vec![
            Cartridge {
                id: 10,
                name: "Lapua .308 Win".to_string(),
                cartridge_type_ids: vec![RIFLE],
            },
            Cartridge {
                id: 11,
                name: ".223 Remington".to_string(),
                cartridge_type_ids: vec![RIFLE],
            },
            Cartridge {
                id: 12,
                name: "9mm Luger".to_string(),
                cartridge_type_ids: vec![PISTOL],
            },
        ],
        vec![
            PrimerType {
                id: 20,
                name: "Large Rifle".to_string(),
                cartridge_type_id: RIFLE,
            },
            PrimerType {
                id: 21,
                name: "Small Rifle".to_string(),
                cartridge_type_id: RIFLE,
            },
            PrimerType {
                id: 22,
                name: "Small Pistol".to_string(),
                cartridge_type_id: PISTOL,
            },
        ],
        vec![
            Powder {
                id: 30,
                name: "Varget".to_string(),
                manufacturer_name: "Hodgdon".to_string(),
                cartridge_type_ids: vec![RIFLE],
            },
            Powder {
                id: 31,
                name: "H4350".to_string(),
                manufacturer_name: "Hodgdon".to_string(),
                cartridge_type_ids: vec![RIFLE],
            },
            Powder {
                id: 32,
                name: "Unique".to_string(),
                manufacturer_name: "Alliant".to_string(),
                cartridge_type_ids: vec![RIFLE, PISTOL],
            },
            Powder {
                id: 33,
                name: "Titegroup".to_string(),
                manufacturer_name: "Hodgdon".to_string(),
                cartridge_type_ids: vec![PISTOL],
            },
        ],
        vec![
            BulletWeight {
                id: 100,
                weight: 168.0,
                cartridge_type_ids: vec![RIFLE],
            },
            BulletWeight {
                id: 101,
                weight: 155.0,
                cartridge_type_ids: vec![RIFLE],
            },
        ],
        vec![
            Bullet {
                id: 200,
                name: "MatchKing 168gr BTHP".to_string(),
                manufacturer_name: "Sierra".to_string(),
                weight: 168.0,
            },
            Bullet {
                id: 201,
                name: "ELD-M 168gr".to_string(),
                manufacturer_name: "Hornady".to_string(),
                weight: 168.0,
            },
            Bullet {
                id: 202,
                name: "Palma 155gr".to_string(),
                manufacturer_name: "Sierra".to_string(),
                weight: 155.0,
            },
        ],
    )
}

/// A draft that passes every rule.
fn valid_draft() -> SessionDraft {
    SessionDraft {
        cartridge_type_id: Some(RIFLE),
        cartridge_id: Some(10),
        primer_type_id: Some(20),
        powder_id: Some(30),
        bullet_weight_id: Some(100),
        bullet_id: Some(200),
        data_source_id: Some(uuid::Uuid::new_v4()),
        account_id: Some(uuid::Uuid::new_v4()),
        ..SessionDraft::default()
    }
}

fn ids(options: &[OptionItem]) -> Vec<Option<i64>> {
    options.iter().map(|o| o.id).collect()
}

speculate! {
    before {
        let snapshot = fixture();
    }

    describe "filter engine" {
        describe "candidate_cartridges" {
            it "returns exactly the cartridges linked to the cartridge type" {
                let rifle: Vec<i64> = filter::candidate_cartridges(&snapshot, Some(RIFLE))
                    .iter().map(|c| c.id).collect();
                assert_eq!(rifle, vec![10, 11]);

                let pistol: Vec<i64> = filter::candidate_cartridges(&snapshot, Some(PISTOL))
                    .iter().map(|c| c.id).collect();
                assert_eq!(pistol, vec![12]);
            }

            it "returns an empty list when nothing is selected" {
                assert!(filter::candidate_cartridges(&snapshot, None).is_empty());
            }

            it "returns an empty list for an unknown cartridge type" {
                assert!(filter::candidate_cartridges(&snapshot, Some(999)).is_empty());
            }
        }

        describe "candidate_primer_types" {
            it "matches the single cartridge-type reference" {
                let rifle: Vec<i64> = filter::candidate_primer_types(&snapshot, Some(RIFLE))
                    .iter().map(|pt| pt.id).collect();
                assert_eq!(rifle, vec![20, 21]);
            }

            it "is empty with no selection" {
                assert!(filter::candidate_primer_types(&snapshot, None).is_empty());
            }
        }

        describe "candidate_powders" {
            it "contains exactly the linked powders sorted ascending by name" {
                let rifle: Vec<&str> = filter::candidate_powders(&snapshot, Some(RIFLE))
                    .iter().map(|p| p.name.as_str()).collect();
                assert_eq!(rifle, vec!["H4350", "Unique", "Varget"]);

                let pistol: Vec<&str> = filter::candidate_powders(&snapshot, Some(PISTOL))
                    .iter().map(|p| p.name.as_str()).collect();
                assert_eq!(pistol, vec!["Titegroup", "Unique"]);
            }

            it "is empty with no selection" {
                assert!(filter::candidate_powders(&snapshot, None).is_empty());
            }
        }

        describe "candidate_bullets" {
            it "matches bullets by weight value, sorted by manufacturer then name" {
                let bullets: Vec<i64> = filter::candidate_bullets(&snapshot, Some(100))
                    .iter().map(|b| b.id).collect();
                // Hornady before Sierra; the 155gr Palma is excluded
                assert_eq!(bullets, vec![201, 200]);
            }

            it "resolves a different weight to its own group" {
                let bullets: Vec<i64> = filter::candidate_bullets(&snapshot, Some(101))
                    .iter().map(|b| b.id).collect();
                assert_eq!(bullets, vec![202]);
            }

            it "is empty when the weight id does not resolve" {
                assert!(filter::candidate_bullets(&snapshot, Some(999)).is_empty());
                assert!(filter::candidate_bullets(&snapshot, None).is_empty());
            }
        }
    }

    describe "cascade controller" {
        describe "initialization" {
            it "starts with empty dependent lists when nothing is pre-populated" {
                let controller = CascadeController::empty(&snapshot);

                assert_eq!(ids(controller.option_list(SelectField::Cartridge)), vec![None]);
                assert_eq!(ids(controller.option_list(SelectField::PrimerType)), vec![None]);
                assert_eq!(ids(controller.option_list(SelectField::Powder)), vec![None]);
                assert_eq!(ids(controller.option_list(SelectField::Bullet)), vec![None]);
            }

            it "builds dependent lists from pre-populated values without clearing selections" {
                let controller = CascadeController::new(&snapshot, SelectionState {
                    cartridge_type_id: Some(RIFLE),
                    cartridge_id: Some(10),
                    bullet_weight_id: Some(100),
                    bullet_id: Some(200),
                    ..SelectionState::default()
                });

                assert_eq!(
                    ids(controller.option_list(SelectField::Cartridge)),
                    vec![None, Some(10), Some(11)]
                );
                assert_eq!(
                    ids(controller.option_list(SelectField::Bullet)),
                    vec![None, Some(201), Some(200)]
                );
                assert_eq!(controller.selection().cartridge_id, Some(10));
                assert_eq!(controller.selection().bullet_id, Some(200));
            }

            it "lists catalog weights ascending with one-decimal labels" {
                let controller = CascadeController::empty(&snapshot);

                let weights = controller.option_list(SelectField::BulletWeight);
                assert_eq!(ids(weights), vec![None, Some(101), Some(100)]);
                assert_eq!(weights[1].label, "155.0");
                assert_eq!(weights[2].label, "168.0");
            }

            it "always puts the blank sentinel first in every list" {
                let controller = CascadeController::new(&snapshot, SelectionState {
                    cartridge_type_id: Some(RIFLE),
                    bullet_weight_id: Some(100),
                    ..SelectionState::default()
                });

                for field in [
                    SelectField::CartridgeType,
                    SelectField::Cartridge,
                    SelectField::PrimerType,
                    SelectField::Powder,
                    SelectField::BulletWeight,
                    SelectField::Bullet,
                ] {
                    let first = &controller.option_list(field)[0];
                    assert_eq!(first.id, None, "{} list must start blank", field.as_str());
                    assert!(first.label.is_empty());
                }
            }
        }

        describe "on_cartridge_type_changed" {
            it "rebuilds the three dependent lists" {
                let mut controller = CascadeController::empty(&snapshot);
                controller.on_cartridge_type_changed(Some(RIFLE));

                assert_eq!(
                    ids(controller.option_list(SelectField::Cartridge)),
                    vec![None, Some(10), Some(11)]
                );
                assert_eq!(
                    ids(controller.option_list(SelectField::PrimerType)),
                    vec![None, Some(20), Some(21)]
                );
                assert_eq!(
                    ids(controller.option_list(SelectField::Powder)),
                    vec![None, Some(31), Some(32), Some(30)]
                );
            }

            it "clears the dependent selections even when still technically valid" {
                let mut controller = CascadeController::new(&snapshot, SelectionState {
                    cartridge_type_id: Some(RIFLE),
                    cartridge_id: Some(10),
                    primer_type_id: Some(20),
                    powder_id: Some(32),
                    ..SelectionState::default()
                });

                // Unique (32) is linked to both types, but the reset is
                // unconditional: the new cartridge type invalidates the
                // combination as a whole.
                controller.on_cartridge_type_changed(Some(PISTOL));

                assert_eq!(controller.selection().cartridge_id, None);
                assert_eq!(controller.selection().primer_type_id, None);
                assert_eq!(controller.selection().powder_id, None);
            }

            it "leaves bullet and bullet weight selections untouched" {
                let mut controller = CascadeController::new(&snapshot, SelectionState {
                    bullet_weight_id: Some(100),
                    bullet_id: Some(200),
                    ..SelectionState::default()
                });

                controller.on_cartridge_type_changed(Some(RIFLE));

                assert_eq!(controller.selection().bullet_weight_id, Some(100));
                assert_eq!(controller.selection().bullet_id, Some(200));
            }

            it "never narrows the bullet weight option list" {
                let mut controller = CascadeController::empty(&snapshot);
                let before = controller.option_list(SelectField::BulletWeight).to_vec();

                // The 168gr weight is linked only to Rifle, but the weight
                // dropdown ignores cartridge type entirely.
                controller.on_cartridge_type_changed(Some(PISTOL));

                assert_eq!(controller.option_list(SelectField::BulletWeight), before);
            }

            it "empties the dependent lists when deselected" {
                let mut controller = CascadeController::empty(&snapshot);
                controller.on_cartridge_type_changed(Some(RIFLE));
                controller.on_cartridge_type_changed(None);

                assert_eq!(ids(controller.option_list(SelectField::Cartridge)), vec![None]);
                assert_eq!(ids(controller.option_list(SelectField::Powder)), vec![None]);
            }

            it "is idempotent" {
                let mut once = CascadeController::empty(&snapshot);
                once.on_cartridge_type_changed(Some(RIFLE));

                let mut twice = CascadeController::empty(&snapshot);
                twice.on_cartridge_type_changed(Some(RIFLE));
                twice.on_cartridge_type_changed(Some(RIFLE));

                assert_eq!(once.selection(), twice.selection());
                for field in [SelectField::Cartridge, SelectField::PrimerType, SelectField::Powder] {
                    assert_eq!(once.option_list(field), twice.option_list(field));
                }
            }
        }

        describe "on_bullet_weight_changed" {
            it "rebuilds the bullet list and clears the bullet selection" {
                let mut controller = CascadeController::empty(&snapshot);
                controller.select_bullet(Some(202));

                controller.on_bullet_weight_changed(Some(100));

                assert_eq!(
                    ids(controller.option_list(SelectField::Bullet)),
                    vec![None, Some(201), Some(200)]
                );
                assert_eq!(controller.selection().bullet_id, None);
            }

            it "does not touch the cartridge-side selections" {
                let mut controller = CascadeController::new(&snapshot, SelectionState {
                    cartridge_type_id: Some(RIFLE),
                    cartridge_id: Some(10),
                    ..SelectionState::default()
                });

                controller.on_bullet_weight_changed(Some(101));

                assert_eq!(controller.selection().cartridge_type_id, Some(RIFLE));
                assert_eq!(controller.selection().cartridge_id, Some(10));
            }
        }
    }

    describe "validator" {
        describe "bullet weight presence" {
            it "reports MissingBulletWeight when both catalog id and override are absent" {
                let mut draft = valid_draft();
                draft.bullet_weight_id = None;
                draft.bullet_weight_other = None;

                let violations = validate_draft(&draft);
                assert!(violations.contains(&Violation {
                    field: DraftField::BulletWeight,
                    rule: Rule::MissingBulletWeight,
                }));
            }

            it "passes with only the catalog weight" {
                let draft = valid_draft();
                assert!(validate_draft(&draft).is_empty());
            }

            it "passes with only the override" {
                let mut draft = valid_draft();
                draft.bullet_weight_id = None;
                draft.bullet_weight_other = Some(168.25);

                assert!(validate_draft(&draft).is_empty());
            }

            it "passes when both are present" {
                let mut draft = valid_draft();
                draft.bullet_weight_other = Some(168.25);

                assert!(validate_draft(&draft).is_empty());
            }
        }

        describe "required references" {
            it "reports each missing reference on its own field" {
                let violations = validate_draft(&SessionDraft::default());

                for field in [
                    DraftField::CartridgeType,
                    DraftField::Cartridge,
                    DraftField::PrimerType,
                    DraftField::Powder,
                    DraftField::Bullet,
                    DraftField::DataSource,
                    DraftField::Account,
                ] {
                    assert!(
                        violations.contains(&Violation {
                            field,
                            rule: Rule::MissingRequiredReference,
                        }),
                        "expected missing-reference violation for {}",
                        field.as_str()
                    );
                }
            }

            it "returns the complete set in one pass" {
                let violations = validate_draft(&SessionDraft::default());
                // 7 missing references + the bullet weight rule
                assert_eq!(violations.len(), 8);
            }
        }

        describe "numeric rules" {
            it "reports NotPositive for negative values" {
                let mut draft = valid_draft();
                draft.quantity = Some(-5.0);
                draft.cartridge_overall_length = Some(-1.0);
                draft.bullet_weight_other = Some(-10.5);

                let violations = validate_draft(&draft);
                for field in [
                    DraftField::Quantity,
                    DraftField::CartridgeOverallLength,
                    DraftField::BulletWeightOther,
                ] {
                    assert!(violations.contains(&Violation { field, rule: Rule::NotPositive }));
                }
            }

            it "reports NotAnInteger for a fractional quantity" {
                let mut draft = valid_draft();
                draft.quantity = Some(10.5);

                let violations = validate_draft(&draft);
                assert_eq!(
                    violations,
                    vec![Violation {
                        field: DraftField::Quantity,
                        rule: Rule::NotAnInteger,
                    }]
                );
            }

            it "reports NotAnInteger for a quantity too large for an integer column" {
                let mut draft = valid_draft();
                draft.quantity = Some(1e19);

                let violations = validate_draft(&draft);
                assert_eq!(
                    violations,
                    vec![Violation {
                        field: DraftField::Quantity,
                        rule: Rule::NotAnInteger,
                    }]
                );
            }

            it "reports NotPositive for a negative powder charge" {
                let mut draft = valid_draft();
                draft.powder_weight = Some(-5.0);

                let violations = validate_draft(&draft);
                assert_eq!(
                    violations,
                    vec![Violation {
                        field: DraftField::PowderWeight,
                        rule: Rule::NotPositive,
                    }]
                );
            }

            it "reports nothing when all optional numerics are absent" {
                let draft = valid_draft();
                assert!(validate_draft(&draft).is_empty());
            }

            it "accepts positive values" {
                let mut draft = valid_draft();
                draft.quantity = Some(50.0);
                draft.cartridge_overall_length = Some(2.8);
                draft.powder_weight = Some(42.5);

                assert!(validate_draft(&draft).is_empty());
            }
        }
    }

    describe "end to end" {
        it "walks a rifle load from cartridge type to bullet" {
            let mut controller = CascadeController::empty(&snapshot);

            controller.on_cartridge_type_changed(Some(RIFLE));
            let cartridges = controller.option_list(SelectField::Cartridge);
            assert!(cartridges.iter().any(|o| o.label == "Lapua .308 Win"));
            assert!(cartridges.iter().all(|o| o.label != "9mm Luger"));

            controller.select_cartridge(Some(10));
            controller.select_primer_type(Some(20));
            controller.select_powder(Some(30));

            controller.on_bullet_weight_changed(Some(100));
            let bullets = controller.option_list(SelectField::Bullet);
            assert!(bullets.iter().any(|o| o.label == "Sierra - MatchKing 168gr BTHP"));
            assert!(bullets.iter().all(|o| o.label != "Sierra - Palma 155gr"));
            controller.select_bullet(Some(200));

            let selection = controller.selection();
            let draft = SessionDraft {
                cartridge_type_id: selection.cartridge_type_id,
                cartridge_id: selection.cartridge_id,
                primer_type_id: selection.primer_type_id,
                powder_id: selection.powder_id,
                bullet_weight_id: selection.bullet_weight_id,
                bullet_id: selection.bullet_id,
                data_source_id: Some(uuid::Uuid::new_v4()),
                account_id: Some(uuid::Uuid::new_v4()),
                ..SessionDraft::default()
            };
            assert!(validate_draft(&draft).is_empty());
        }

        it "flags a submission with no weight, then accepts a free-form override" {
            let mut controller = CascadeController::empty(&snapshot);
            controller.on_cartridge_type_changed(Some(RIFLE));

            let mut draft = valid_draft();
            draft.bullet_weight_id = None;

            let violations = validate_draft(&draft);
            assert!(violations.contains(&Violation {
                field: DraftField::BulletWeight,
                rule: Rule::MissingBulletWeight,
            }));

            controller.set_bullet_weight_other(Some(168.25));
            draft.bullet_weight_other = controller.selection().bullet_weight_other;
            assert!(validate_draft(&draft).is_empty());
        }
    }
}
