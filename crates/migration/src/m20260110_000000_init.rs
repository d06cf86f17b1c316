//! Initial schema migration.
//!
//! Creates the complete schema for Pavilion:
//!
//! - `users`: authentication and role (`admin` / `readonly`)
//! - `vehicles`: imported vehicles with sale status and recorded profit
//! - `investors`: people contributing capital
//! - `vehicle_investments`: capital contributed by an investor to a vehicle
//! - `profit_distributions`: pro-rata profit payouts per investment

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
    Role,
}

#[derive(Iden)]
enum Vehicles {
    Table,
    Id,
    ChassisNo,
    VehicleType,
    Year,
    TotalCost,
    SalePrice,
    Profit,
    Sold,
    VehicleStatus,
}

#[derive(Iden)]
enum Investors {
    Table,
    Id,
    Name,
    ContactInfo,
    Email,
    Notes,
}

#[derive(Iden)]
enum VehicleInvestments {
    Table,
    Id,
    VehicleId,
    InvestorId,
    Amount,
    InvestmentDate,
    Notes,
}

#[derive(Iden)]
enum ProfitDistributions {
    Table,
    Id,
    VehicleId,
    InvestorId,
    Amount,
    Percentage,
    DistributionDate,
    Notes,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("readonly"),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Vehicles
        // ───────────────────────────────────────────────────────────────────
        // `sold` is the legacy "Yes"/"No" flag, `vehicle_status` the enum.
        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vehicles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vehicles::ChassisNo).string().not_null())
                    .col(ColumnDef::new(Vehicles::VehicleType).string())
                    .col(ColumnDef::new(Vehicles::Year).integer())
                    .col(ColumnDef::new(Vehicles::TotalCost).double())
                    .col(ColumnDef::new(Vehicles::SalePrice).double())
                    .col(ColumnDef::new(Vehicles::Profit).double())
                    .col(ColumnDef::new(Vehicles::Sold).string())
                    .col(ColumnDef::new(Vehicles::VehicleStatus).string())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Investors
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Investors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Investors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Investors::Name).string().not_null())
                    .col(ColumnDef::new(Investors::ContactInfo).string())
                    .col(ColumnDef::new(Investors::Email).string())
                    .col(ColumnDef::new(Investors::Notes).string())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Vehicle investments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(VehicleInvestments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VehicleInvestments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VehicleInvestments::VehicleId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VehicleInvestments::InvestorId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VehicleInvestments::Amount)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VehicleInvestments::InvestmentDate).date())
                    .col(ColumnDef::new(VehicleInvestments::Notes).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-vehicle_investments-vehicle_id")
                            .from(VehicleInvestments::Table, VehicleInvestments::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-vehicle_investments-investor_id")
                            .from(VehicleInvestments::Table, VehicleInvestments::InvestorId)
                            .to(Investors::Table, Investors::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-vehicle_investments-vehicle_id")
                    .table(VehicleInvestments::Table)
                    .col(VehicleInvestments::VehicleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-vehicle_investments-investor_id")
                    .table(VehicleInvestments::Table)
                    .col(VehicleInvestments::InvestorId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Profit distributions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ProfitDistributions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProfitDistributions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProfitDistributions::VehicleId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfitDistributions::InvestorId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfitDistributions::Amount)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfitDistributions::Percentage)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfitDistributions::DistributionDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProfitDistributions::Notes).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-profit_distributions-vehicle_id")
                            .from(ProfitDistributions::Table, ProfitDistributions::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-profit_distributions-investor_id")
                            .from(ProfitDistributions::Table, ProfitDistributions::InvestorId)
                            .to(Investors::Table, Investors::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-profit_distributions-vehicle_id")
                    .table(ProfitDistributions::Table)
                    .col(ProfitDistributions::VehicleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-profit_distributions-investor_id")
                    .table(ProfitDistributions::Table)
                    .col(ProfitDistributions::InvestorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProfitDistributions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VehicleInvestments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Investors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
