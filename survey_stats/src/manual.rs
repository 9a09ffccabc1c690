/*!

This is the long-form manual for `survey_stats` and the `wellness` dashboard.

## Input format

The survey is a single table with one respondent per row and a header row.
Columns are found by name, their position does not matter. The following
columns are required; extra columns are loaded and ignored:

| Column | Content |
|---|---|
| `Age` | integer |
| `Gender` | category |
| `no_employees` | company size bucket: `5-Jan`, `25-Jun`, `26-100`, `100-500`, `500-1000`, `More than 1000` |
| `tech_company`, `remote_work`, `family_history`, `treatment` | `Yes` / `No` |
| `work_interfere` | `Never`, `Rarely`, `Sometimes`, `Often`, or empty |
| `benefits`, `wellness_program`, `care_options`, `leave`, `mental_health_consequence`, `phys_health_consequence`, `coworkers`, `supervisor`, `mental_vs_physical`, `obs_consequence` | attitudinal answers (`Yes`, `No`, `Don't know`, `Maybe`, ...) |

The first two company size buckets are the spreadsheet-mangled `1-5` and
`6-25`. They are kept verbatim.

An empty cell, or one of the usual markers (`NA`, `N/A`, `NaN`, `null`,
`None`, ...), is a missing answer. Missing answers are not counted in any
table and do not count in the denominators.

Two providers are supported by the dashboard:

### `csv`

A delimited text file. The delimiter is `,` by default.

```text
Age,Gender,no_employees,tech_company,...
37,Female,25-Jun,Yes,...
```

### `xlsx`

An Excel workbook. The first row of the worksheet is the header. Numbers are
read as text (`37.0` becomes `37`). Date cells are read in the day-month form
of the company size buckets: a cell holding 5 January reads as `5-Jan`, one
holding 25 June as `25-Jun`. The year is ignored. Error cells fail the load.

## Aggregations

- **Distribution**: count of every value of a column. With a fixed category
  order, every listed category is present, with zero when never observed.
- **Cross-tabulation**: for every value of a row column, the percentage of each
  value of a column column. Every row sums to 100. A combination that never
  occurs is 0%.
- **Grouped proportion**: the distribution of a column within each group of
  another column. Each group sums to 100. A category that does not occur in a
  group has no entry for that group.
- **Impact score**: difference in treatment rate, in percentage points,
  between the comparison level and the baseline level of a factor.
- **KPI**: share of one level of a column, formatted with one decimal (`70.0%`).

A factor or KPI that refers to a level absent from the data is an error: no
score is reported rather than a misleading zero.

## Configuration

The dashboard accepts a configuration file in JSON:

```json
{
  "outputSettings": {
    "dashboardName": "Employee Wellness",
    "outputDirectory": "site",
    "plotlyJsUrl": "https://cdn.plot.ly/plotly-2.27.0.min.js"
  },
  "dataSource": {
    "provider": "csv",
    "filePath": "cleaned_employee_data.csv",
    "delimiter": ","
  }
}
```

`filePath` is relative to the configuration file. All the options can also be
passed on the command line (`--input`, `--input-type`, `--out`), which takes
precedence.

 */
