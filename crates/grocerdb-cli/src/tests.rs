use grocerdb_core::{ProductSales, Sale, SalesCatalog, SalesItem};

use super::*;

fn record(vendor: Option<&str>, items: usize) -> ProductSales {
    ProductSales::new(
        SalesCatalog {
            products: (0..items)
                .map(|i| SalesItem {
                    name: format!("item {i}"),
                    sale: Sale::price(10.0).unwrap(),
                })
                .collect(),
        },
        vendor.map(str::to_owned),
    )
}

#[test]
fn parses_scrape_with_defaults() {
    let cli = Cli::try_parse_from(["grocerdb-cli", "scrape"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Scrape {
            ref vendors,
            images_root: None,
            dry_run: false,
        } if vendors.is_empty()
    ));
}

#[test]
fn parses_repeated_vendor_flags() {
    let cli = Cli::try_parse_from([
        "grocerdb-cli",
        "scrape",
        "--vendor",
        "kiwi-no",
        "--vendor",
        "meny-no",
        "--dry-run",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Scrape {
            ref vendors,
            dry_run: true,
            ..
        } if vendors == &["kiwi-no".to_owned(), "meny-no".to_owned()]
    ));
}

#[test]
fn parses_images_root() {
    let cli = Cli::try_parse_from(["grocerdb-cli", "scrape", "--images-root", "/tmp/imgs"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Scrape {
            images_root: Some(ref p),
            ..
        } if p == &PathBuf::from("/tmp/imgs")
    ));
}

#[test]
fn parses_sales_show() {
    let cli = Cli::try_parse_from(["grocerdb-cli", "sales", "show"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Sales {
            command: SalesCommands::Show
        }
    ));
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["grocerdb-cli"]).is_err());
}

#[test]
fn empty_vendor_list_falls_back_to_defaults() {
    let vendors = scrape::resolve_vendors(&[]);
    assert_eq!(vendors.len(), 13);
    assert_eq!(vendors[0], "bunnpris-no");
    assert_eq!(vendors[12], "matkroken-no");

    let explicit = scrape::resolve_vendors(&["joker-no".to_owned()]);
    assert_eq!(explicit, vec!["joker-no"]);
}

#[test]
fn summary_groups_pages_by_vendor() {
    let totals = sales::summarize(&[
        record(Some("kiwi-no"), 3),
        record(Some("meny-no"), 1),
        record(Some("kiwi-no"), 2),
        record(None, 4),
    ]);

    assert_eq!(totals.len(), 3);
    assert_eq!(
        totals["kiwi-no"],
        sales::VendorTotals { pages: 2, items: 5 }
    );
    assert_eq!(totals["(none)"].items, 4);
}
